// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsing strategies for the loosely delimited result dialects.
//!
//! Three layouts recur across benchmark suites:
//!
//! - **throughput matrix**: a colon-delimited header line containing a
//!   marker token (e.g. `Gflops`) followed by exactly one data line
//! - **rate table**: one header row and N data rows, comment and blank
//!   lines skipped
//! - **marker series**: comma-delimited rows following a marker line
//!   (e.g. `Warehouses:Bops`)
//!
//! All strategies are pure over file content. They return `None` when the
//! content holds no usable data and only fail on a schema mismatch.

use perfsheet_core::{Cell, Error, Result, ResultSet, SystemIdentity, VersionInfo};
use tracing::{debug, warn};

/// Split a line on `delimiter`, trimming every field.
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    line.trim()
        .split(delimiter)
        .map(|field| field.trim().to_string())
        .collect()
}

fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Parse a throughput-matrix file.
///
/// The last line containing `marker` is the header and the line right
/// after it is the only data row. Header and data must have the same
/// number of fields.
pub fn parse_throughput_matrix(
    content: &str,
    identity: SystemIdentity,
    version: &VersionInfo,
    marker: &str,
) -> Result<Option<ResultSet>> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 2 {
        debug!(system = %identity.system, "insufficient data for throughput matrix");
        return Ok(None);
    }

    let Some(header_idx) = lines.iter().rposition(|line| line.contains(marker)) else {
        warn!(system = %identity.system, marker, "marker line not found");
        return Ok(None);
    };

    let data_line = lines
        .get(header_idx + 1)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty());
    let Some(data_line) = data_line else {
        debug!(system = %identity.system, marker, "no data line after marker");
        return Ok(None);
    };

    let header = split_fields(lines[header_idx], ':');
    let data = split_fields(data_line, ':');
    if header.len() != data.len() {
        return Err(Error::SchemaMismatch {
            header: header.len(),
            data: data.len(),
        });
    }

    let mut set = ResultSet::new(identity, version.csv_version());
    set.push_header(header);
    set.push_data(data.into_iter().map(Cell::from).collect());
    Ok(Some(set))
}

/// Parse a rate table delimited by `delimiter`.
///
/// The first non-comment, non-blank line is the header; every following
/// one is a data row. Rows may be ragged.
pub fn parse_rate_table(
    content: &str,
    identity: SystemIdentity,
    version: &VersionInfo,
    delimiter: char,
) -> Option<ResultSet> {
    let mut rows = content
        .lines()
        .filter(|line| !is_skippable(line))
        .map(|line| split_fields(line, delimiter));

    let header = rows.next()?;
    let data: Vec<Vec<String>> = rows.collect();
    if data.is_empty() {
        debug!(system = %identity.system, "rate table has a header but no data rows");
        return None;
    }

    let mut set = ResultSet::new(identity, version.csv_version());
    set.push_header(header);
    for row in data {
        set.push_data(row.into_iter().map(Cell::from).collect());
    }
    Some(set)
}

/// Parse comma-delimited rows following `marker`.
///
/// Only the span between the first marker line and the next one (or the
/// end of the content) is used; later spans are ignored. Blank and comment
/// lines inside the span are skipped. `columns` names the header record.
pub fn parse_marker_series(
    content: &str,
    identity: SystemIdentity,
    version: &VersionInfo,
    marker: &str,
    columns: &[&str],
) -> Option<ResultSet> {
    let lines: Vec<&str> = content.lines().collect();
    let markers: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(marker))
        .map(|(idx, _)| idx)
        .collect();

    let start = *markers.first()? + 1;
    let end = markers.get(1).copied().unwrap_or(lines.len());
    if markers.len() > 1 {
        debug!(
            system = %identity.system,
            spans = markers.len(),
            "multiple marker spans, using the first"
        );
    }

    let rows: Vec<Vec<String>> = lines[start..end]
        .iter()
        .filter(|line| !is_skippable(line))
        .map(|line| split_fields(line, ','))
        .collect();
    if rows.is_empty() {
        debug!(system = %identity.system, marker, "no rows after marker");
        return None;
    }

    let mut set = ResultSet::new(identity, version.csv_version());
    set.push_header(columns.iter().copied());
    for row in rows {
        set.push_data(row.into_iter().map(Cell::from).collect());
    }
    Some(set)
}
