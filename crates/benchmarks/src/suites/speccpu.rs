// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Integer and floating point rate suite results.
//!
//! The sub-suite (`fprate` or `intrate`) is taken from the result path; the
//! file itself is a colon-delimited rate table with at least the
//! `Benchmarks` and `Base Rate` columns.

use super::{v1_registry, ExtractRequest, Extractor, SummaryContext};
use crate::formats;
use crate::io;
use crate::summary::{tagged_cells, SummaryAssembler};
use perfsheet_core::{row, Result, ResultSet, Row, SystemIdentity, VersionRegistry};
use std::path::Path;
use tracing::{debug, warn};

/// Benchmark name column.
pub const BENCHMARK_COLUMN: &str = "Benchmarks";

/// Base rate column.
pub const BASE_RATE_COLUMN: &str = "Base Rate";

/// Sub-suites recognized in result paths.
pub const SUB_SUITES: [&str; 2] = ["fprate", "intrate"];

/// Extractors by results version.
pub fn registry() -> VersionRegistry<Extractor> {
    v1_registry(extract_v1)
}

/// Sub-suite named in `path`, if any.
pub fn sub_suite(path: &Path) -> Option<&'static str> {
    let path = path.to_string_lossy();
    SUB_SUITES.into_iter().find(|suite| path.contains(suite))
}

fn extract_v1(req: &ExtractRequest<'_>) -> Result<Option<ResultSet>> {
    let Some(suite) = sub_suite(req.path) else {
        warn!(path = %req.path.display(), "cannot tell fprate from intrate, skipping");
        return Ok(None);
    };
    let Some(content) = io::read_result_file(req.path)? else {
        return Ok(None);
    };

    let identity = SystemIdentity::new(req.system).with_suite(suite);
    let Some(table) = formats::parse_rate_table(&content, identity.clone(), req.version, ':')
    else {
        return Ok(None);
    };
    let name_idx = table.column(BENCHMARK_COLUMN);
    let rate_idx = table.column(BASE_RATE_COLUMN);
    let (Some(name_idx), Some(rate_idx)) = (name_idx, rate_idx) else {
        warn!(path = %req.path.display(), "rate table lacks benchmark or base rate column");
        return Ok(None);
    };

    let mut set = ResultSet::new(identity, req.version.csv_version());
    set.push_header([BENCHMARK_COLUMN, BASE_RATE_COLUMN]);
    for row in table.data_rows() {
        match (row.cell(name_idx), row.cell(rate_idx)) {
            (Some(name), Some(rate)) => set.push_data(vec![name.clone(), rate.clone()]),
            _ => debug!(cells = row.cells.len(), "skipping short rate row"),
        }
    }

    Ok(set.has_data().then_some(set))
}

/// One base-rate table per result set.
pub fn summarize(sets: &[ResultSet], ctx: &SummaryContext<'_>) -> Vec<Row> {
    let mut summary = SummaryAssembler::new(&ctx.config.os_release);
    let base_rate = summary.os_label("Base_Rate");

    for group in ctx.grouping.group(sets, |set| set.system()) {
        for set in group.items() {
            let identity = set.identity();
            summary.titled_table(
                row![identity.system.as_str(), identity.suite.as_deref()],
                ["Benchmark", base_rate.as_str(), "CSV Version"],
                set.data_rows().map(tagged_cells),
            );
        }
    }

    summary.finish()
}
