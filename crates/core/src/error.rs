// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the ingestion pipeline.
//!
//! Only two kinds of failure are allowed to leave a parser: a schema
//! mismatch (fatal for one file) and an unsupported version with no
//! registered fallback (fatal for the whole run). Missing data is not an
//! error; parsers signal it by returning `None`.

use std::io;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while ingesting a result file.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a result file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Header and data rows disagree on the number of fields.
    #[error("Schema mismatch: header has {header} fields, data has {data}")]
    SchemaMismatch {
        /// Number of header fields
        header: usize,
        /// Number of data fields
        data: usize,
    },

    /// No handler is registered for the version and no default exists.
    #[error("Unsupported results version {version}; registered: {}", .supported.join(", "))]
    UnsupportedVersion {
        /// Normalized version that was requested
        version: String,
        /// Versions that do have handlers
        supported: Vec<String>,
    },

    /// A row could not be interpreted as the suite expects.
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Configuration holds a value the pipeline cannot use.
    #[error("Invalid configuration {section}.{key}: {message}")]
    InvalidConfig {
        /// Configuration section
        section: String,
        /// Configuration key
        key: String,
        /// What is wrong with the value
        message: String,
    },
}

impl Error {
    /// Whether the error must stop the whole run rather than one file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnsupportedVersion { .. })
    }
}
