// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for perfsheet.
//!
//! This crate holds everything the ingestion pipeline agrees on:
//!
//! - [`record`] - canonical records, result sets, cells and price metrics
//! - [`version`] - results-version detection and version dispatch
//! - [`instance`] - provider-specific instance naming taxonomy
//! - [`config`] - the immutable per-run configuration
//! - [`traits`] - contracts of the external collaborators
//! - [`error`] - the error taxonomy

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod instance;
pub mod record;
pub mod traits;
pub mod version;

pub use config::{PipelineConfig, Provider};
pub use error::{Error, Result};
pub use instance::{taxonomy_for, InstanceKey, InstanceTaxonomy};
pub use record::{
    CanonicalRecord, Cell, DataRow, PriceMetric, ResultSet, Row, SystemIdentity, DEFAULT_VERSION,
};
pub use traits::{ConfigSource, LookupError, PricingLookup, RowSink, SinkError};
pub use version::{VersionInfo, VersionRegistry};
