// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Concrete collaborators for the perfsheet pipeline.
//!
//! - [`config`] - layered file and environment configuration
//! - [`pricing`] - static price sheet lookups
//! - [`sink`] - CSV, markdown and JSON row sinks

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod pricing;
pub mod sink;

pub use self::config::{ConfigAdapter, ConfigAdapterError, ConfigKey};
pub use pricing::{NoPricing, PriceEntry, PriceTable, PriceTableError};
pub use sink::{CsvSink, JsonSink, MarkdownSink};
