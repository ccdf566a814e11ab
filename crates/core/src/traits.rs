// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Contracts of the collaborators the pipeline consumes.
//!
//! The pipeline never owns configuration storage, pricing data or the
//! spreadsheet it writes to; it talks to them through these traits.
//! Concrete implementations live in `perfsheet-adapters`.

use crate::record::Row;
use std::io;
use thiserror::Error;

/// Read-only `section.key` configuration lookup.
pub trait ConfigSource {
    /// Value of `key` in `section`, if set.
    fn get(&self, section: &str, key: &str) -> Option<String>;
}

/// Errors reported by a pricing lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No price is known for the instance.
    #[error("No price for {instance} ({provider}, {region}, {os})")]
    NotFound {
        /// Instance identifier
        instance: String,
        /// Provider name
        provider: String,
        /// Region
        region: String,
        /// OS type
        os: String,
    },

    /// The pricing source could not answer.
    #[error("Pricing unavailable: {0}")]
    Unavailable(String),
}

/// Hourly cost lookup for cloud instances.
pub trait PricingLookup {
    /// Hourly cost of `instance` in `region` for `provider` and `os`.
    fn hourly_cost(
        &self,
        instance: &str,
        region: &str,
        provider: &str,
        os: &str,
    ) -> Result<f64, LookupError>;
}

/// Errors reported by a row sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to the destination failed.
    #[error("Sink I/O error: {0}")]
    Io(#[from] io::Error),

    /// Rows could not be encoded for the destination.
    #[error("Sink encoding error: {0}")]
    Encode(String),
}

/// Destination for assembled summary rows, e.g. a spreadsheet.
pub trait RowSink {
    /// Append `rows` to the destination named `destination`.
    fn append(&mut self, destination: &str, rows: &[Row]) -> Result<(), SinkError>;
}
