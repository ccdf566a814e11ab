// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Immutable pipeline configuration.
//!
//! Provider, region and OS selection are read once from a
//! [`ConfigSource`] when a run starts and then passed by reference to every
//! component that needs them.

use crate::error::{Error, Result};
use crate::traits::ConfigSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cloud provider whose instance naming convention applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Bare-metal or local systems, no naming convention.
    Local,
    /// Dot-separated names such as `m5.2xlarge`.
    Aws,
    /// Dash-separated names such as `n2-standard-8`.
    Gcp,
    /// Alphanumeric runs such as `D4s`.
    Azure,
}

impl Provider {
    /// Lowercase name used in configuration and pricing lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
        }
    }

    /// All providers.
    pub fn all() -> [Provider; 4] {
        [Self::Local, Self::Aws, Self::Gcp, Self::Azure]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "aws" => Ok(Self::Aws),
            "gcp" => Ok(Self::Gcp),
            "azure" => Ok(Self::Azure),
            other => Err(format!("unknown cloud provider '{}'", other)),
        }
    }
}

/// Settings shared by every stage of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Naming convention and pricing provider.
    pub provider: Provider,
    /// Region passed to pricing lookups.
    pub region: String,
    /// OS type passed to pricing lookups (e.g. `rhel`).
    pub os_type: String,
    /// OS label embedded in summary column headers (e.g. `RHEL-9.4`).
    pub os_release: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Local,
            region: "us-east-1".to_string(),
            os_type: "rhel".to_string(),
            os_release: "RHEL".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Read the configuration once from `source`.
    ///
    /// Missing keys keep their defaults; an unknown provider is an error.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let defaults = Self::default();

        let provider = match source.get("cloud", "cloud_type") {
            Some(value) => value.parse().map_err(|message| Error::InvalidConfig {
                section: "cloud".to_string(),
                key: "cloud_type".to_string(),
                message,
            })?,
            None => defaults.provider,
        };

        Ok(Self {
            provider,
            region: source.get("cloud", "region").unwrap_or(defaults.region),
            os_type: source.get("test", "os_type").unwrap_or(defaults.os_type),
            os_release: source
                .get("test", "os_release")
                .unwrap_or(defaults.os_release),
        })
    }
}
