// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Transactional throughput (SPECjbb) results.
//!
//! The result file holds one or more `Warehouses:Bops` blocks of
//! comma-separated `warehouses,bops` rows; only the first block is used.

use super::{v1_registry, ExtractRequest, Extractor, SummaryContext};
use crate::formats;
use crate::io;
use crate::summary::{tagged_cells, SummaryAssembler};
use perfsheet_core::{row, Result, ResultSet, Row, SystemIdentity, VersionRegistry};

/// Line introducing a block of throughput rows.
pub const MARKER: &str = "Warehouses:Bops";

/// Columns of every throughput row.
pub const COLUMNS: [&str; 2] = ["Warehouses", "Bops"];

const BOPS_COLUMN: usize = 1;

/// Extractors by results version.
pub fn registry() -> VersionRegistry<Extractor> {
    v1_registry(extract_v1)
}

fn extract_v1(req: &ExtractRequest<'_>) -> Result<Option<ResultSet>> {
    let Some(content) = io::read_result_file(req.path)? else {
        return Ok(None);
    };
    Ok(formats::parse_marker_series(
        &content,
        SystemIdentity::new(req.system),
        req.version,
        MARKER,
        &COLUMNS,
    ))
}

/// Per instance its throughput rows; per taxonomy group peak throughput,
/// hourly cost and peak efficiency.
pub fn summarize(sets: &[ResultSet], ctx: &SummaryContext<'_>) -> Vec<Row> {
    let mut summary = SummaryAssembler::new(&ctx.config.os_release);
    let thrput_label = summary.os_label("Thrput");
    let price_perf_label = summary.os_label("Price-perf");

    for group in ctx.grouping.group(sets, |set| set.system()) {
        let mut peaks = Vec::new();
        let mut costs = Vec::new();
        let mut efficiencies = Vec::new();

        for set in group.items() {
            let system = set.system();
            summary.titled_table(
                row![system],
                ["Warehouses", thrput_label.as_str(), "CSV Version"],
                set.data_rows().map(tagged_cells),
            );

            let bops = set.data_rows().filter_map(|r| r.cell(BOPS_COLUMN));
            let metric = ctx.calculator.peak_efficiency(system, bops);
            peaks.push(row![system, metric.peak_throughput]);
            costs.push(row![system, metric.cost_per_hour]);
            efficiencies.push(row![system, metric.peak_efficiency]);
        }

        summary.section(row!["Peak", thrput_label.as_str()], peaks);
        summary.section(row!["Cost/Hr"], costs);
        summary.section(
            row!["Peak/$eff", price_perf_label.as_str()],
            efficiencies,
        );
    }

    summary.finish()
}
