// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tabular layout of summaries.
//!
//! A summary is a sequence of labeled sub-tables:
//!
//! ```text
//! [title]
//! [column, column-<OS>, ...]
//! [cell, cell, ...]
//! ...
//! [""]
//! ```
//!
//! The assembler does no computation; suites hand it finished cells.

use perfsheet_core::{row, Cell, DataRow, Row};

/// Builds the final row sequence for a sink.
#[derive(Debug, Clone, Default)]
pub struct SummaryAssembler {
    os_release: String,
    rows: Vec<Row>,
}

impl SummaryAssembler {
    /// Assembler labeling OS-dependent columns with `os_release`.
    pub fn new(os_release: impl Into<String>) -> Self {
        Self {
            os_release: os_release.into(),
            rows: Vec::new(),
        }
    }

    /// `<label>-<OS>` column header.
    pub fn os_label(&self, label: &str) -> String {
        format!("{}-{}", label, self.os_release)
    }

    /// Append a titled sub-table followed by a blank separator row.
    pub fn table<H, S>(
        &mut self,
        title: impl Into<String>,
        header: H,
        rows: impl IntoIterator<Item = Row>,
    ) where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let title: String = title.into();
        self.titled_table(row![title], header, rows);
    }

    /// Like [`table`](Self::table), with a multi-cell title row.
    pub fn titled_table<H, S>(&mut self, title: Row, header: H, rows: impl IntoIterator<Item = Row>)
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(title);
        self.rows
            .push(header.into_iter().map(|c| Cell::Text(c.into())).collect());
        self.rows.extend(rows);
        self.blank();
    }

    /// Append a sub-table whose title shares the header row.
    pub fn section(&mut self, header: Row, rows: impl IntoIterator<Item = Row>) {
        self.rows.push(header);
        self.rows.extend(rows);
        self.blank();
    }

    /// Append a blank separator row.
    pub fn blank(&mut self) {
        self.rows.push(row![""]);
    }

    /// Number of rows assembled so far.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing has been assembled.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The assembled rows.
    pub fn finish(self) -> Vec<Row> {
        self.rows
    }
}

/// Cells of a data row, with the version tag appended when present.
pub fn tagged_cells(row: &DataRow) -> Row {
    let mut cells = row.cells.clone();
    if let Some(version) = &row.csv_version {
        cells.push(Cell::Text(version.clone()));
    }
    cells
}
