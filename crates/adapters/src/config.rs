// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration adapter.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults for every [`ConfigKey`]
//! 2. an optional configuration file (format chosen by extension)
//! 3. environment variables such as `PERFSHEET_CLOUD__REGION`
//!
//! # Example
//!
//! ```no_run
//! use perfsheet_adapters::config::ConfigAdapter;
//! use std::path::Path;
//!
//! let adapter = ConfigAdapter::load(Some(Path::new("config.ini")))?;
//! let config = adapter.pipeline_config()?;
//! println!("pricing {} instances in {}", config.provider, config.region);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use perfsheet_core::{ConfigSource, PipelineConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "PERFSHEET";

/// Separator between section and key in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigAdapterError {
    /// Configuration file does not exist
    #[error("Configuration file not found: {0}")]
    MissingFile(PathBuf),

    /// A source could not be read or merged
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigAdapterError>;

/// Settings the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Cloud provider naming convention (`local`, `aws`, `gcp`, `azure`)
    CloudType,
    /// Region for pricing lookups
    Region,
    /// OS type for pricing lookups
    OsType,
    /// OS label used in summary headers
    OsRelease,
}

impl ConfigKey {
    /// Every key.
    pub fn all() -> [ConfigKey; 4] {
        [Self::CloudType, Self::Region, Self::OsType, Self::OsRelease]
    }

    /// Section the key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            Self::CloudType | Self::Region => "cloud",
            Self::OsType | Self::OsRelease => "test",
        }
    }

    /// Key name within the section.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CloudType => "cloud_type",
            Self::Region => "region",
            Self::OsType => "os_type",
            Self::OsRelease => "os_release",
        }
    }

    /// Value used when no source sets the key.
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::CloudType => "local",
            Self::Region => "us-east-1",
            Self::OsType => "rhel",
            Self::OsRelease => "RHEL",
        }
    }

    /// Dotted `section.key` path.
    pub fn path(&self) -> String {
        format!("{}.{}", self.section(), self.key())
    }
}

/// Layered configuration implementing [`ConfigSource`].
#[derive(Debug, Clone)]
pub struct ConfigAdapter {
    settings: Config,
}

impl ConfigAdapter {
    /// Load defaults, `file` if given, and `PERFSHEET_*` variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    /// Like [`load`](Self::load) with another environment prefix.
    pub fn load_with_prefix(file: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Self::defaults()?;
        if let Some(path) = file {
            if !path.is_file() {
                return Err(ConfigAdapterError::MissingFile(path.to_path_buf()));
            }
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR),
        );

        Ok(Self {
            settings: builder.build()?,
        })
    }

    /// Defaults plus `overrides`, without file or environment.
    pub fn in_memory(overrides: &[(ConfigKey, &str)]) -> Result<Self> {
        let mut builder = Self::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(key.path(), *value)?;
        }
        Ok(Self {
            settings: builder.build()?,
        })
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let mut builder = Config::builder();
        for key in ConfigKey::all() {
            builder = builder.set_default(key.path(), key.default_value())?;
        }
        Ok(builder)
    }

    /// Value of a typed key.
    pub fn value(&self, key: ConfigKey) -> String {
        self.get(key.section(), key.key())
            .unwrap_or_else(|| key.default_value().to_string())
    }

    /// Build the run configuration from these settings.
    pub fn pipeline_config(&self) -> perfsheet_core::Result<PipelineConfig> {
        PipelineConfig::from_source(self)
    }
}

impl ConfigSource for ConfigAdapter {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.settings
            .get_string(&format!("{}.{}", section, key))
            .ok()
    }
}
