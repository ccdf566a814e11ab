// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for result files and summary rows.
//!
//! Result files are read fully into memory before parsing. Summary rows can
//! be written to and read back from JSON files (an array of arrays of
//! scalar cells).

use perfsheet_core::{Result, Row};
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Extension every result file must carry.
pub const RESULT_EXTENSION: &str = "csv";

/// Read a result file.
///
/// Files without the `.csv` extension are skipped and yield `None`; read
/// failures are errors for this file only.
pub fn read_result_file(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    let is_result = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RESULT_EXTENSION));
    if !is_result {
        warn!(path = %path.display(), "not a .csv result file, skipping");
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}

/// Write summary rows to a JSON file.
pub fn write_rows_json(rows: &[Row], path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Read summary rows from a JSON file.
pub fn read_rows_json(path: impl AsRef<Path>) -> io::Result<Vec<Row>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
