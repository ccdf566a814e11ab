// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark suites.
//!
//! A suite ties a result dialect to a parsing strategy and a summary
//! layout. Extractors are only reached through the suite's
//! [`VersionRegistry`], so unknown future versions fall back to the `1.0`
//! layout with a warning instead of being rejected.

pub mod coremark_pro;
pub mod etcd;
pub mod linpack;
pub mod speccpu;
pub mod specjbb;

use crate::grouping::GroupingEngine;
use crate::pricing::PricePerformanceCalculator;
use perfsheet_core::{PipelineConfig, Result, ResultSet, Row, VersionInfo, VersionRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Everything an extractor gets to work with.
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    /// Result file (or run directory for directory-based suites).
    pub path: &'a Path,
    /// System the results belong to.
    pub system: &'a str,
    /// Version information of the results.
    pub version: &'a VersionInfo,
}

/// Version-specific extraction function.
pub type Extractor = fn(&ExtractRequest<'_>) -> Result<Option<ResultSet>>;

/// Collaborators available while summarizing.
pub struct SummaryContext<'a> {
    /// Run configuration.
    pub config: &'a PipelineConfig,
    /// Cost lookups and derived metrics.
    pub calculator: PricePerformanceCalculator<'a>,
    /// Taxonomy grouping for the configured provider.
    pub grouping: GroupingEngine<'a>,
}

/// Registry with the v1 extractor under `1.0` and `1.1`.
fn v1_registry(extractor: Extractor) -> VersionRegistry<Extractor> {
    VersionRegistry::new()
        .register("1.0", extractor)
        .register("1.1", extractor)
}

/// Supported benchmark suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    /// Linear-algebra throughput (auto HPL).
    Linpack,
    /// Integer and floating point rate suites.
    SpecCpu,
    /// Embedded workload scores.
    CoremarkPro,
    /// Transactional throughput.
    SpecJbb,
    /// Key-value store load test.
    Etcd,
}

impl Suite {
    /// All suites.
    pub fn all() -> [Suite; 5] {
        [
            Self::Linpack,
            Self::SpecCpu,
            Self::CoremarkPro,
            Self::SpecJbb,
            Self::Etcd,
        ]
    }

    /// Suite name, also used as the sink destination.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linpack => "linpack",
            Self::SpecCpu => "speccpu",
            Self::CoremarkPro => "coremark_pro",
            Self::SpecJbb => "specjbb",
            Self::Etcd => "etcd",
        }
    }

    /// Version-keyed extractors of this suite.
    pub fn registry(&self) -> VersionRegistry<Extractor> {
        match self {
            Self::Linpack => linpack::registry(),
            Self::SpecCpu => speccpu::registry(),
            Self::CoremarkPro => coremark_pro::registry(),
            Self::SpecJbb => specjbb::registry(),
            Self::Etcd => etcd::registry(),
        }
    }

    /// File whose metadata carries the version for `path`.
    pub fn version_source(&self, path: &Path) -> PathBuf {
        match self {
            Self::Etcd => etcd::first_result_file(path).unwrap_or_else(|| path.to_path_buf()),
            _ => path.to_path_buf(),
        }
    }

    /// Lay out the summary rows for `sets`.
    pub fn summarize(&self, sets: &[ResultSet], ctx: &SummaryContext<'_>) -> Vec<Row> {
        match self {
            Self::Linpack => linpack::summarize(sets, ctx),
            Self::SpecCpu => speccpu::summarize(sets, ctx),
            Self::CoremarkPro => coremark_pro::summarize(sets, ctx),
            Self::SpecJbb => specjbb::summarize(sets, ctx),
            Self::Etcd => etcd::summarize(sets, ctx),
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "linpack" | "auto_hpl" => Ok(Self::Linpack),
            "speccpu" => Ok(Self::SpecCpu),
            "coremark_pro" => Ok(Self::CoremarkPro),
            "specjbb" => Ok(Self::SpecJbb),
            "etcd" => Ok(Self::Etcd),
            other => Err(format!("unknown benchmark suite '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_names_round_trip() {
        for suite in Suite::all() {
            assert_eq!(suite.name().parse::<Suite>().unwrap(), suite);
        }
        assert_eq!("auto-hpl".parse::<Suite>().unwrap(), Suite::Linpack);
        assert!("fio".parse::<Suite>().is_err());
    }

    #[test]
    fn test_every_suite_registers_default() {
        for suite in Suite::all() {
            let registry = suite.registry();
            assert!(registry.versions().contains(&"1.0".to_string()));
            assert!(registry.dispatch("9.9").is_ok());
        }
    }
}
