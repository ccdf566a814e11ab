// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end ingestion driver.
//!
//! For every input: resolve the results version, dispatch to the suite's
//! extractor and collect the result set. Once all inputs are read the
//! suite lays out its summary and the rows go to the sink.
//!
//! Failure policy:
//!
//! - "no result" (wrong extension, no data) skips the input
//! - a parse failure is recorded against the input and the run continues
//! - an unsupported version without fallback stops the run

use crate::grouping::GroupingEngine;
use crate::pricing::PricePerformanceCalculator;
use crate::suites::{ExtractRequest, Suite, SummaryContext};
use perfsheet_core::{
    taxonomy_for, InstanceTaxonomy, PipelineConfig, PricingLookup, Result, ResultSet, Row,
    RowSink, SinkError, VersionInfo,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that stop a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A fatal ingestion error, see [`perfsheet_core::Error::is_fatal`].
    #[error(transparent)]
    Fatal(#[from] perfsheet_core::Error),

    /// The summary could not be written.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// One result input: the system it belongs to and where its results are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInput {
    /// System or instance name.
    pub system: String,
    /// Result file, or run directory for directory-based suites.
    pub path: PathBuf,
}

impl RunInput {
    /// Input for `system` read from `path`.
    pub fn new(system: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            system: system.into(),
            path: path.into(),
        }
    }
}

impl FromStr for RunInput {
    type Err = String;

    /// Parse `SYSTEM=PATH`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((system, path)) if !system.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self::new(system.trim(), path.trim()))
            }
            _ => Err(format!("expected SYSTEM=PATH, got '{}'", s)),
        }
    }
}

impl fmt::Display for RunInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.system, self.path.display())
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Suite that was processed.
    pub suite: Suite,
    /// Inputs that produced a result set.
    pub extracted: usize,
    /// Inputs that produced no result.
    pub skipped: Vec<PathBuf>,
    /// Inputs that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Summary rows handed to the sink.
    pub rows: usize,
}

impl RunReport {
    fn new(suite: Suite) -> Self {
        Self {
            suite,
            extracted: 0,
            skipped: Vec::new(),
            failed: Vec::new(),
            rows: 0,
        }
    }

    /// Whether every input was either extracted or skipped.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives extraction and summaries for one configuration.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    pricing: &'a dyn PricingLookup,
    taxonomy: Box<dyn InstanceTaxonomy>,
}

impl<'a> Pipeline<'a> {
    /// Pipeline for `config`, pricing instances with `pricing`.
    ///
    /// The instance taxonomy is selected here, once, from the provider.
    pub fn new(config: &'a PipelineConfig, pricing: &'a dyn PricingLookup) -> Self {
        Self {
            config,
            pricing,
            taxonomy: taxonomy_for(config.provider),
        }
    }

    /// Configuration the pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        self.config
    }

    /// Version information of the results at `path`.
    pub fn resolve_version(&self, suite: Suite, path: &Path) -> VersionInfo {
        VersionInfo::from_path(suite.version_source(path))
    }

    /// Extract one input of `suite`.
    pub fn extract(&self, suite: Suite, path: &Path, system: &str) -> Result<Option<ResultSet>> {
        let version = self.resolve_version(suite, path);
        debug!(
            suite = %suite,
            path = %path.display(),
            raw = ?version.raw,
            normalized = %version.normalized,
            "resolved results version"
        );

        let registry = suite.registry();
        let extractor = registry.dispatch(&version.normalized)?;
        extractor(&ExtractRequest {
            path,
            system,
            version: &version,
        })
    }

    /// Summary rows of `suite` for `sets`.
    pub fn summarize(&self, suite: Suite, sets: &[ResultSet]) -> Vec<Row> {
        let ctx = SummaryContext {
            config: self.config,
            calculator: PricePerformanceCalculator::new(self.pricing, self.config),
            grouping: GroupingEngine::new(self.taxonomy.as_ref()),
        };
        suite.summarize(sets, &ctx)
    }

    /// Extract every input, summarize and append the rows to `sink`.
    pub fn run(
        &self,
        suite: Suite,
        inputs: &[RunInput],
        sink: &mut dyn RowSink,
    ) -> std::result::Result<RunReport, PipelineError> {
        info!(
            suite = %suite,
            inputs = inputs.len(),
            provider = %self.config.provider,
            "processing results"
        );
        let mut report = RunReport::new(suite);
        let mut sets = Vec::new();

        for input in inputs {
            match self.extract(suite, &input.path, &input.system) {
                Ok(Some(set)) => sets.push(set),
                Ok(None) => {
                    warn!(input = %input, "no results extracted");
                    report.skipped.push(input.path.clone());
                }
                Err(e) if e.is_fatal() => {
                    error!(input = %input, error = %e, "aborting run");
                    return Err(e.into());
                }
                Err(e) => {
                    error!(input = %input, error = %e, "failed to extract results");
                    report.failed.push((input.path.clone(), e.to_string()));
                }
            }
        }
        report.extracted = sets.len();

        let rows = self.summarize(suite, &sets);
        report.rows = rows.len();
        if rows.is_empty() {
            info!(suite = %suite, "nothing to write");
        } else {
            sink.append(suite.name(), &rows)?;
            info!(suite = %suite, rows = rows.len(), "summary written");
        }

        Ok(report)
    }
}
