// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Key-value store load test (etcd) results.
//!
//! Unlike the other suites the input is a run directory:
//!
//! ```text
//! <dir>/run-1/result_etcd.csv
//! <dir>/run-2/result_etcd.csv
//! ```
//!
//! Runs are read in name order and concatenated into one result set, each
//! row prefixed with its run name.

use super::{v1_registry, ExtractRequest, Extractor, SummaryContext};
use crate::formats;
use crate::io;
use crate::summary::{tagged_cells, SummaryAssembler};
use perfsheet_core::{row, Cell, Error, Result, ResultSet, Row, SystemIdentity, VersionRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of a run's results.
pub const RESULT_FILE: &str = "result_etcd.csv";

/// Column prepended to every run's header.
pub const RUN_COLUMN: &str = "Run";

/// Extractors by results version.
pub fn registry() -> VersionRegistry<Extractor> {
    v1_registry(extract_v1)
}

/// `(run name, result file)` for every run folder under `dir`, by name.
pub fn run_files(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut runs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        runs.push((name, entry.path().join(RESULT_FILE)));
    }
    runs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(runs)
}

/// Result file of the first run, which carries the version metadata.
pub fn first_result_file(dir: &Path) -> Option<PathBuf> {
    run_files(dir)
        .ok()?
        .into_iter()
        .map(|(_, file)| file)
        .find(|file| file.is_file())
}

fn extract_v1(req: &ExtractRequest<'_>) -> Result<Option<ResultSet>> {
    let mut combined: Option<ResultSet> = None;

    for (run, file) in run_files(req.path)? {
        if !file.is_file() {
            warn!(run = %run, path = %file.display(), "run has no result file, skipping");
            continue;
        }
        let Some(content) = io::read_result_file(&file)? else {
            continue;
        };
        let identity = SystemIdentity::new(req.system);
        let Some(table) = formats::parse_rate_table(&content, identity.clone(), req.version, ':')
        else {
            debug!(run = %run, "run has no data rows");
            continue;
        };
        let columns = table.header().unwrap_or_default();

        let set = combined.get_or_insert_with(|| {
            let mut header = vec![RUN_COLUMN];
            header.extend(columns.iter().map(String::as_str));
            let mut set = ResultSet::new(identity, req.version.csv_version());
            set.push_header(header);
            set
        });
        let expected = set.header().map_or(0, |h| h.len());
        if expected != columns.len() + 1 {
            return Err(Error::SchemaMismatch {
                header: expected,
                data: columns.len() + 1,
            });
        }

        for row in table.data_rows() {
            let mut cells = vec![Cell::from(run.as_str())];
            cells.extend(row.cells.iter().cloned());
            set.push_data(cells);
        }
    }

    Ok(combined)
}

/// One table per result set: run header and rows.
pub fn summarize(sets: &[ResultSet], ctx: &SummaryContext<'_>) -> Vec<Row> {
    let mut summary = SummaryAssembler::new(&ctx.config.os_release);

    for group in ctx.grouping.group(sets, |set| set.system()) {
        for set in group.items() {
            let mut header = vec![RUN_COLUMN.to_string()];
            if let Some(columns) = set.header() {
                header.extend(columns.iter().skip(1).map(|c| summary.os_label(c)));
            }
            header.push("CSV Version".to_string());

            summary.titled_table(
                row![set.system()],
                header,
                set.data_rows().map(tagged_cells),
            );
        }
    }

    summary.finish()
}
