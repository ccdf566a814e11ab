// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Canonical record types.
//!
//! Every format parser, whatever the dialect of its input, produces a
//! [`ResultSet`]: an ordered list of [`CanonicalRecord`]s for one
//! (system, benchmark run) pair.
//!
//! # Invariants
//!
//! ```text
//! records[0]  Identity   (always)
//! records[1]  Metadata   CSV_Version (always)
//! records[2..] Header / Data
//! ```
//!
//! The first data row pushed into a result set carries the version tag, so
//! the version survives into the summary without re-reading the source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata key under which the results version is recorded.
pub const CSV_VERSION_KEY: &str = "CSV_Version";

/// Version reported when a file carries no version metadata.
pub const DEFAULT_VERSION: &str = "1.0";

/// A single scalar cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Numeric value.
    Number(f64),
    /// Text value, kept verbatim from the source.
    Text(String),
    /// Missing value, rendered as an empty cell.
    Empty,
}

impl Cell {
    /// Interpret the cell as a number.
    ///
    /// Text cells are parsed after trimming; empty cells yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Empty => None,
        }
    }

    /// Text content of the cell, if it holds text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the cell renders as nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// A row of cells as handed to a sink. Rows may be ragged.
pub type Row = Vec<Cell>;

/// Build a [`Row`] from anything convertible to cells.
#[macro_export]
macro_rules! row {
    () => { ::std::vec::Vec::<$crate::record::Cell>::new() };
    ($($cell:expr),+ $(,)?) => {
        vec![$($crate::record::Cell::from($cell)),+]
    };
}

/// Who produced a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemIdentity {
    /// System or instance name (e.g. `m5.xlarge`).
    pub system: String,
    /// Sub-suite when a benchmark has several (e.g. `fprate`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
}

impl SystemIdentity {
    /// Identity with only a system name.
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            suite: None,
        }
    }

    /// Attach a sub-suite name.
    pub fn with_suite(mut self, suite: impl Into<String>) -> Self {
        self.suite = Some(suite.into());
        self
    }
}

/// A data row, optionally tagged with the results version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    /// Cells in header order.
    pub cells: Vec<Cell>,
    /// Raw results version; set on the first data row of a result set only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_version: Option<String>,
}

impl DataRow {
    /// Cell at `index`, if present.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }
}

/// One reportable row of a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalRecord {
    /// Identifies the system the results belong to.
    Identity(SystemIdentity),
    /// A key/value fact about the run.
    Metadata {
        /// Metadata key
        key: String,
        /// Metadata value
        value: String,
    },
    /// Column names for the data rows that follow.
    Header {
        /// Column names
        columns: Vec<String>,
    },
    /// A row of measurements.
    Data(DataRow),
}

/// Ordered records for one (system, benchmark run) pair.
///
/// Only [`ResultSet::new`] builds one, so the identity and version records
/// always lead. It serializes but never deserializes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    records: Vec<CanonicalRecord>,
}

impl ResultSet {
    /// Start a result set for `identity`, recording the raw results version.
    pub fn new(identity: SystemIdentity, csv_version: impl Into<String>) -> Self {
        Self {
            records: vec![
                CanonicalRecord::Identity(identity),
                CanonicalRecord::Metadata {
                    key: CSV_VERSION_KEY.to_string(),
                    value: csv_version.into(),
                },
            ],
        }
    }

    /// Identity of the system.
    pub fn identity(&self) -> &SystemIdentity {
        match &self.records[0] {
            CanonicalRecord::Identity(identity) => identity,
            _ => unreachable!("result set always starts with an identity record"),
        }
    }

    /// System name, shorthand for `identity().system`.
    pub fn system(&self) -> &str {
        &self.identity().system
    }

    /// Raw results version recorded at construction.
    pub fn csv_version(&self) -> &str {
        match &self.records[1] {
            CanonicalRecord::Metadata { value, .. } => value,
            _ => DEFAULT_VERSION,
        }
    }

    /// Append a header record.
    pub fn push_header<S: Into<String>>(&mut self, columns: impl IntoIterator<Item = S>) {
        self.records.push(CanonicalRecord::Header {
            columns: columns.into_iter().map(Into::into).collect(),
        });
    }

    /// Append a data record. The first data row gets the version tag.
    pub fn push_data(&mut self, cells: Vec<Cell>) {
        let csv_version = if self.has_data() {
            None
        } else {
            Some(self.csv_version().to_string())
        };
        self.records
            .push(CanonicalRecord::Data(DataRow { cells, csv_version }));
    }

    /// All records in order.
    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    /// The first header record, if any.
    pub fn header(&self) -> Option<&[String]> {
        self.records.iter().find_map(|r| match r {
            CanonicalRecord::Header { columns } => Some(columns.as_slice()),
            _ => None,
        })
    }

    /// Position of `name` in the header.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header()?.iter().position(|c| c == name)
    }

    /// Data rows in order.
    pub fn data_rows(&self) -> impl Iterator<Item = &DataRow> {
        self.records.iter().filter_map(|r| match r {
            CanonicalRecord::Data(row) => Some(row),
            _ => None,
        })
    }

    /// Whether any data row has been pushed.
    pub fn has_data(&self) -> bool {
        self.data_rows().next().is_some()
    }

    /// Cell of `row` under the header column `name`.
    pub fn field<'a>(&self, row: &'a DataRow, name: &str) -> Option<&'a Cell> {
        self.column(name).and_then(|idx| row.cell(idx))
    }
}

/// Cost efficiency of one measured system.
///
/// `efficiency` is only present when the cost is a positive number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceMetric {
    /// Hourly cost, absent when pricing was unavailable.
    pub cost_per_hour: Option<f64>,
    /// Performance figure the efficiency is derived from.
    pub performance: f64,
    /// `performance / cost_per_hour`.
    pub efficiency: Option<f64>,
}

impl PriceMetric {
    /// Derive the metric; never divides by a zero or missing cost.
    pub fn new(performance: f64, cost_per_hour: Option<f64>) -> Self {
        let efficiency = cost_per_hour
            .filter(|cost| *cost > 0.0)
            .map(|cost| performance / cost);
        Self {
            cost_per_hour,
            performance,
            efficiency,
        }
    }

    /// Efficiency, or `0.0` when there is no usable cost.
    pub fn efficiency_or_zero(&self) -> f64 {
        self.efficiency.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        let mut set = ResultSet::new(SystemIdentity::new("node-1"), "v1.1.2743");
        set.push_header(["A", "B", "Gflops"]);
        set.push_data(row!["1", "2", "3.5"]);
        set.push_data(row!["4", "5", "6.5"]);
        set
    }

    #[test]
    fn test_fixed_positions() {
        let set = sample();
        assert!(matches!(set.records()[0], CanonicalRecord::Identity(_)));
        assert_eq!(set.system(), "node-1");
        assert_eq!(set.csv_version(), "v1.1.2743");
    }

    #[test]
    fn test_only_first_data_row_tagged() {
        let set = sample();
        let tags: Vec<_> = set.data_rows().map(|r| r.csv_version.clone()).collect();
        assert_eq!(tags, vec![Some("v1.1.2743".to_string()), None]);
    }

    #[test]
    fn test_field_lookup_by_header() {
        let set = sample();
        let first = set.data_rows().next().unwrap();
        assert_eq!(set.field(first, "Gflops"), Some(&Cell::from("3.5")));
        assert_eq!(set.field(first, "missing"), None);
    }

    #[test]
    fn test_cell_conversions() {
        assert_eq!(Cell::from(" 42.0 ").as_f64(), Some(42.0));
        assert_eq!(Cell::from("n/a").as_f64(), None);
        assert_eq!(Cell::from(None::<f64>), Cell::Empty);
        assert!(Cell::Empty.is_empty());
        assert_eq!(Cell::Number(2.0).to_string(), "2");
    }

    #[test]
    fn test_cells_serialize_as_scalars() {
        let row = row!["a", 1.5, None::<f64>];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["a",1.5,null]"#);
    }

    #[test]
    fn test_price_metric_absent_cost() {
        let metric = PriceMetric::new(100.0, None);
        assert_eq!(metric.efficiency, None);

        let metric = PriceMetric::new(100.0, Some(0.0));
        assert_eq!(metric.efficiency, None);

        let metric = PriceMetric::new(100.0, Some(50.0));
        assert_eq!(metric.efficiency, Some(2.0));
        assert_eq!(metric.efficiency_or_zero(), 2.0);
        assert_eq!(PriceMetric::new(100.0, None).efficiency_or_zero(), 0.0);
    }

    #[test]
    fn test_result_set_serializes_tagged_records() {
        let json = serde_json::to_value(sample()).unwrap();
        let records = json["records"].as_array().unwrap();
        assert_eq!(records[0]["kind"], "identity");
        assert_eq!(records[0]["system"], "node-1");
        assert_eq!(records[1]["kind"], "metadata");
        assert_eq!(records[1]["value"], "v1.1.2743");
        assert_eq!(records[3]["csv_version"], "v1.1.2743");
    }
}
