// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! Row sinks.
//!
//! Each sink writes a destination's rows somewhere a person can read them:
//! a CSV file, a markdown document or a JSON file.

use perfsheet_benchmarks::{io as rows_io, markdown};
use perfsheet_core::{Row, RowSink, SinkError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

fn ensure_dir(dir: &Path) -> Result<(), SinkError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Writes `<dir>/<destination>.csv`, one record per row.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a destination is written to.
    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", destination))
    }
}

impl RowSink for CsvSink {
    fn append(&mut self, destination: &str, rows: &[Row]) -> Result<(), SinkError> {
        ensure_dir(&self.dir)?;
        let path = self.path_for(destination);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
        for row in rows {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .map_err(|e| SinkError::Encode(e.to_string()))?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = rows.len(), "appended rows");
        Ok(())
    }
}

/// Renders each destination as a markdown document into a writer.
#[derive(Debug)]
pub struct MarkdownSink<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownSink<W> {
    /// Sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// The underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RowSink for MarkdownSink<W> {
    fn append(&mut self, destination: &str, rows: &[Row]) -> Result<(), SinkError> {
        self.writer
            .write_all(markdown::generate_table(destination, rows).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes `<dir>/<destination>.json`, an array of row arrays.
///
/// Appending to an existing destination extends its rows.
#[derive(Debug, Clone)]
pub struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a destination is written to.
    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.dir.join(format!("{}.json", destination))
    }
}

impl RowSink for JsonSink {
    fn append(&mut self, destination: &str, rows: &[Row]) -> Result<(), SinkError> {
        ensure_dir(&self.dir)?;
        let path = self.path_for(destination);
        let mut all = if path.exists() {
            rows_io::read_rows_json(&path)?
        } else {
            Vec::new()
        };
        all.extend_from_slice(rows);
        rows_io::write_rows_json(&all, &path)?;

        info!(path = %path.display(), rows = rows.len(), "appended rows");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfsheet_core::row;

    fn rows() -> Vec<Row> {
        vec![
            row!["Cost/Hr"],
            row!["System name", "Cost/Hr"],
            row!["m5.xlarge", 0.192],
            row![""],
        ]
    }

    #[test]
    fn test_csv_sink_writes_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(dir.path().join("out"));
        sink.append("linpack", &rows()).unwrap();

        let content = fs::read_to_string(sink.path_for("linpack")).unwrap();
        assert_eq!(
            content,
            "Cost/Hr\nSystem name,Cost/Hr\nm5.xlarge,0.192\n\"\"\n"
        );
    }

    #[test]
    fn test_csv_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvSink::new(dir.path());
        sink.append("etcd", &[row!["a", "b"]]).unwrap();
        sink.append("etcd", &[row!["c"]]).unwrap();
        let content = fs::read_to_string(sink.path_for("etcd")).unwrap();
        assert_eq!(content, "a,b\nc\n");
    }

    #[test]
    fn test_markdown_sink() {
        let mut sink = MarkdownSink::new(Vec::new());
        sink.append("linpack", &rows()).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("# linpack"));
        assert!(output.contains("| m5.xlarge   | 0.192   |"));
    }

    #[test]
    fn test_json_sink_extends_destination() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonSink::new(dir.path());
        sink.append("specjbb", &rows()).unwrap();
        sink.append("specjbb", &[row!["more"]]).unwrap();

        let written = rows_io::read_rows_json(sink.path_for("specjbb")).unwrap();
        assert_eq!(written.len(), 5);
        assert_eq!(written[4], row!["more"]);
    }
}
