// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Linear-algebra throughput (auto HPL) results.
//!
//! ```text
//! T/V:N:NB:P:Q:Time:Gflops
//! WR11C2R4:86016:256:2:4:371.45:1.1396e+03
//! ```

use super::{v1_registry, ExtractRequest, Extractor, SummaryContext};
use crate::formats;
use crate::io;
use crate::summary::SummaryAssembler;
use perfsheet_core::{row, Cell, Result, ResultSet, Row, SystemIdentity, VersionRegistry};

/// Column holding the throughput; also marks the header line.
pub const MARKER: &str = "Gflops";

/// Extractors by results version.
pub fn registry() -> VersionRegistry<Extractor> {
    v1_registry(extract_v1)
}

fn extract_v1(req: &ExtractRequest<'_>) -> Result<Option<ResultSet>> {
    let Some(content) = io::read_result_file(req.path)? else {
        return Ok(None);
    };
    let identity = SystemIdentity::new(req.system);
    formats::parse_throughput_matrix(&content, identity, req.version, MARKER)
}

/// Throughput of a linpack result set.
pub fn gflops(set: &ResultSet) -> Option<f64> {
    let row = set.data_rows().next()?;
    set.field(row, MARKER).and_then(Cell::as_f64)
}

/// Per taxonomy group: scores, hourly cost and throughput per dollar.
pub fn summarize(sets: &[ResultSet], ctx: &SummaryContext<'_>) -> Vec<Row> {
    let mut summary = SummaryAssembler::new(&ctx.config.os_release);

    for group in ctx.grouping.group(sets, |set| set.system()) {
        let mut scores = Vec::new();
        let mut costs = Vec::new();
        let mut price_perf = Vec::new();

        for set in group.items() {
            let system = set.system();
            let score = gflops(set);
            let perf = score.unwrap_or(0.0);
            let metric = ctx.calculator.metric_or_absent(system, perf);
            scores.push(row![system, score, set.csv_version()]);
            costs.push(row![system, metric.cost_per_hour]);
            price_perf.push(row![system, score.map(|_| metric.efficiency_or_zero())]);
        }

        let gflops_label = summary.os_label(MARKER);
        let per_dollar_label = summary.os_label("Gflops/$");
        summary.table(
            MARKER,
            ["System name", gflops_label.as_str(), "CSV Version"],
            scores,
        );
        summary.table("Cost/Hr", ["System name", "Cost/Hr"], costs);
        summary.table(
            "Price-perf",
            ["System name", per_dollar_label.as_str()],
            price_perf,
        );
    }

    summary.finish()
}
