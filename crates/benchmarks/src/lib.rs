// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Versioned benchmark result ingestion and price-performance summaries.
//!
//! Each supported suite reads its own loosely delimited result dialect,
//! normalizes it into [`ResultSet`](perfsheet_core::ResultSet)s and lays out
//! a summary of labeled sub-tables for a row sink.
//!
//! # Quick Start
//!
//! ```no_run
//! use perfsheet_benchmarks::{Pipeline, RunInput, Suite};
//! use perfsheet_core::{LookupError, PipelineConfig, PricingLookup, Row, RowSink, SinkError};
//!
//! struct Free;
//! impl PricingLookup for Free {
//!     fn hourly_cost(&self, _: &str, _: &str, _: &str, _: &str) -> Result<f64, LookupError> {
//!         Ok(0.0)
//!     }
//! }
//!
//! struct Stdout;
//! impl RowSink for Stdout {
//!     fn append(&mut self, destination: &str, rows: &[Row]) -> Result<(), SinkError> {
//!         print!("{}", perfsheet_benchmarks::markdown::generate_table(destination, rows));
//!         Ok(())
//!     }
//! }
//!
//! let config = PipelineConfig::default();
//! let pipeline = Pipeline::new(&config, &Free);
//! let inputs = vec![RunInput::new("node-1", "results_auto_hpl.csv")];
//! let report = pipeline.run(Suite::Linpack, &inputs, &mut Stdout).unwrap();
//! println!("{} extracted, {} failed", report.extracted, report.failed.len());
//! ```
//!
//! # Modules
//!
//! - [`formats`] - The three result dialect parsers
//! - [`suites`] - Per-suite versioned extractors and summary layouts
//! - [`grouping`] - Taxonomy grouping and ordering
//! - [`pricing`] - Price-performance metrics
//! - [`summary`] - Sub-table layout
//! - [`pipeline`] - The end-to-end driver
//! - [`io`] - Result file and JSON row I/O
//! - [`markdown`] - Markdown rendering of rows

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod formats;
pub mod grouping;
pub mod io;
pub mod markdown;
pub mod pipeline;
pub mod pricing;
pub mod suites;
pub mod summary;

pub use grouping::{Group, GroupingEngine};
pub use pipeline::{Pipeline, PipelineError, RunInput, RunReport};
pub use pricing::{price_performance, MetricError, PeakMetric, PricePerformanceCalculator};
pub use suites::Suite;
pub use summary::SummaryAssembler;
