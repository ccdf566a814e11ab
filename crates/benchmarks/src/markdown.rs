// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown rendering of summary rows.
//!
//! Blank rows split the summary into sub-tables. A single-cell first row
//! becomes the sub-table's heading; the next row is its header.

use perfsheet_core::{Cell, Row};
use std::fmt::{self, Write};

/// Render `rows` as a markdown document titled `destination`.
pub fn generate_table(destination: &str, rows: &[Row]) -> String {
    let mut output = String::new();
    render(&mut output, destination, rows).map_or_else(|_| String::new(), |_| output)
}

fn render(output: &mut String, destination: &str, rows: &[Row]) -> fmt::Result {
    writeln!(output, "# {}", destination)?;
    writeln!(output)?;
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339())?;

    for block in blocks(rows) {
        writeln!(output)?;
        let block = match block {
            [title, rest @ ..] if title.len() == 1 && !rest.is_empty() => {
                writeln!(output, "## {}", escape(&title[0]))?;
                writeln!(output)?;
                rest
            }
            _ => block,
        };
        write_pipe_table(output, block)?;
    }

    Ok(())
}

/// Sub-tables of `rows`, without their blank separators.
fn blocks(rows: &[Row]) -> impl Iterator<Item = &[Row]> {
    rows.split(|row| is_blank(row))
        .filter(|block| !block.is_empty())
}

fn is_blank(row: &Row) -> bool {
    row.iter().all(Cell::is_empty)
}

fn write_pipe_table(output: &mut String, rows: &[Row]) -> fmt::Result {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Ok(());
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..columns)
                .map(|idx| row.get(idx).map(escape).unwrap_or_default())
                .collect()
        })
        .collect();
    let widths: Vec<usize> = (0..columns)
        .map(|idx| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(3)
        })
        .collect();

    for (line, row) in cells.iter().enumerate() {
        write_line(output, row, &widths)?;
        if line == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            write_line(output, &rule, &widths)?;
        }
    }

    Ok(())
}

fn write_line(output: &mut String, cells: &[String], widths: &[usize]) -> fmt::Result {
    write!(output, "|")?;
    for (cell, width) in cells.iter().zip(widths) {
        write!(output, " {:<width$} |", cell, width = *width)?;
    }
    writeln!(output)
}

fn escape(cell: &Cell) -> String {
    cell.to_string().replace('|', "\\|")
}
