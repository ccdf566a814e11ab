// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Embedded workload (CoreMark-PRO) results.
//!
//! Colon-delimited rate table, one row per workload plus a `Score` row with
//! the totals:
//!
//! ```text
//! Test:Multi iterations:Single iterations:Scaling
//! cjpeg-rose7-preset:555.56:166.67:3.33
//! Score:19876.54:5432.10
//! ```

use super::{v1_registry, ExtractRequest, Extractor, SummaryContext};
use crate::formats;
use crate::io;
use crate::pricing::price_performance;
use crate::summary::SummaryAssembler;
use perfsheet_core::{row, Cell, DataRow, Result, ResultSet, Row, SystemIdentity, VersionRegistry};

/// Name (case-insensitive) of the totals row.
pub const SCORE_ROW: &str = "score";

const MULTI_COLUMN: usize = 1;
const SINGLE_COLUMN: usize = 2;

/// Extractors by results version.
pub fn registry() -> VersionRegistry<Extractor> {
    v1_registry(extract_v1)
}

fn extract_v1(req: &ExtractRequest<'_>) -> Result<Option<ResultSet>> {
    let Some(content) = io::read_result_file(req.path)? else {
        return Ok(None);
    };
    let identity = SystemIdentity::new(req.system);
    Ok(formats::parse_rate_table(&content, identity, req.version, ':'))
}

fn is_score_row(row: &DataRow) -> bool {
    row.cell(0)
        .and_then(Cell::as_str)
        .is_some_and(|name| name.eq_ignore_ascii_case(SCORE_ROW))
}

fn score(row: &DataRow, column: usize) -> f64 {
    row.cell(column).and_then(Cell::as_f64).unwrap_or(0.0)
}

/// Totals as `(multi, single)`; zero when the score row is missing.
pub fn totals(set: &ResultSet) -> (f64, f64) {
    set.data_rows()
        .find(|row| is_score_row(row))
        .map(|row| (score(row, MULTI_COLUMN), score(row, SINGLE_COLUMN)))
        .unwrap_or((0.0, 0.0))
}

fn details(set: &ResultSet, column: usize) -> Vec<Row> {
    set.data_rows()
        .filter(|row| !is_score_row(row))
        .map(|row| {
            let name = row.cell(0).cloned().unwrap_or(Cell::Empty);
            vec![name, Cell::from(row.cell(column).and_then(Cell::as_f64))]
        })
        .collect()
}

/// Per result set: totals, cost, price-performance and per-workload details.
///
/// Result sets are laid out in input order; they are not grouped by
/// instance taxonomy.
pub fn summarize(sets: &[ResultSet], ctx: &SummaryContext<'_>) -> Vec<Row> {
    let mut summary = SummaryAssembler::new(&ctx.config.os_release);
    let score_label = summary.os_label("Score");
    let per_dollar_label = summary.os_label("Score/$");

    for set in sets {
        let system = set.system();
        let (multi, single) = totals(set);
        let metric = ctx.calculator.metric_or_absent(system, single);

        summary.table(
            "Single Iterations",
            ["System name", score_label.as_str(), "CSV Version"],
            [row![system, single, set.csv_version()]],
        );
        summary.table(
            "Multi Iterations",
            ["System name", score_label.as_str()],
            [row![system, multi]],
        );
        summary.table(
            "Cost/Hr",
            ["System name", "Cost/Hr"],
            [row![system, metric.cost_per_hour]],
        );
        summary.table(
            "Single Iterations Price-perf",
            ["System name", per_dollar_label.as_str()],
            [row![system, metric.efficiency_or_zero()]],
        );
        summary.table(
            "Multi Iterations Price-perf",
            ["System name", per_dollar_label.as_str()],
            [row![system, price_performance(multi, metric.cost_per_hour)]],
        );
        summary.table(
            "Single Iterations Details",
            ["Test", score_label.as_str()],
            details(set, SINGLE_COLUMN),
        );
        summary.table(
            "Multi Iterations Details",
            ["Test", score_label.as_str()],
            details(set, MULTI_COLUMN),
        );
    }

    summary.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        let mut set = ResultSet::new(SystemIdentity::new("m5.xlarge"), "1.0");
        set.push_header(["Test", "Multi iterations", "Single iterations"]);
        set.push_data(row!["cjpeg-rose7-preset", "555.56", "166.67"]);
        set.push_data(row!["SCORE", "19876.54", "5432.10"]);
        set
    }

    #[test]
    fn test_totals_from_score_row() {
        assert_eq!(totals(&sample()), (19876.54, 5432.10));
    }

    #[test]
    fn test_totals_default_to_zero() {
        let mut set = ResultSet::new(SystemIdentity::new("m5.xlarge"), "1.0");
        set.push_header(["Test", "Multi iterations", "Single iterations"]);
        set.push_data(row!["cjpeg-rose7-preset", "555.56", "166.67"]);
        assert_eq!(totals(&set), (0.0, 0.0));
    }

    #[test]
    fn test_details_skip_score_row() {
        let single = details(&sample(), SINGLE_COLUMN);
        assert_eq!(single, vec![row!["cjpeg-rose7-preset", 166.67]]);
        let multi = details(&sample(), MULTI_COLUMN);
        assert_eq!(multi, vec![row!["cjpeg-rose7-preset", 555.56]]);
    }
}
