// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end runs of the ingestion pipeline against on-disk fixtures.

use mockall::mock;
use perfsheet_benchmarks::suites::linpack;
use perfsheet_benchmarks::{Pipeline, RunInput, Suite};
use perfsheet_core::{
    row, Error, LookupError, PipelineConfig, PricingLookup, Provider, Row, RowSink, SinkError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

mock! {
    Pricing {}
    impl PricingLookup for Pricing {
        fn hourly_cost(
            &self,
            instance: &str,
            region: &str,
            provider: &str,
            os: &str,
        ) -> Result<f64, LookupError>;
    }
}

#[derive(Default)]
struct RecordingSink {
    appended: Vec<(String, Vec<Row>)>,
}

impl RowSink for RecordingSink {
    fn append(&mut self, destination: &str, rows: &[Row]) -> Result<(), SinkError> {
        self.appended.push((destination.to_string(), rows.to_vec()));
        Ok(())
    }
}

fn pricing(cost: f64) -> MockPricing {
    let mut pricing = MockPricing::new();
    pricing
        .expect_hourly_cost()
        .returning(move |_, _, _, _| Ok(cost));
    pricing
}

fn unpriced() -> MockPricing {
    let mut pricing = MockPricing::new();
    pricing
        .expect_hourly_cost()
        .returning(|_, _, _, _| Err(LookupError::Unavailable("offline".to_string())));
    pricing
}

fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn position(rows: &[Row], row: &Row) -> usize {
    rows.iter()
        .position(|r| r == row)
        .unwrap_or_else(|| panic!("row {:?} not in summary", row))
}

#[test]
fn test_linpack_file_without_version_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(&dir, "results_auto_hpl.csv", "# auto hpl\nGflops\n42.0\n");
    let config = PipelineConfig::default();
    let pricing = pricing(2.0);
    let pipeline = Pipeline::new(&config, &pricing);

    let set = pipeline
        .extract(Suite::Linpack, &path, "node-1")
        .unwrap()
        .unwrap();
    assert_eq!(set.system(), "node-1");
    let score = set.data_rows().next().unwrap();
    assert_eq!(score.cells, row!["42.0"]);
    assert_eq!(score.csv_version.as_deref(), Some("1.0"));

    let mut sink = RecordingSink::default();
    let inputs = [RunInput::new("node-1", &path)];
    let report = pipeline.run(Suite::Linpack, &inputs, &mut sink).unwrap();
    assert_eq!(report.extracted, 1);
    assert!(report.is_clean());

    let (destination, rows) = &sink.appended[0];
    assert_eq!(destination, "linpack");
    assert_eq!(
        rows,
        &vec![
            row!["Gflops"],
            row!["System name", "Gflops-RHEL", "CSV Version"],
            row!["node-1", 42.0, "1.0"],
            row![""],
            row!["Cost/Hr"],
            row!["System name", "Cost/Hr"],
            row!["node-1", 2.0],
            row![""],
            row!["Price-perf"],
            row!["System name", "Gflops/$-RHEL"],
            row!["node-1", 21.0],
            row![""],
        ]
    );
}

#[test]
fn test_specjbb_uses_first_marker_span_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(
        &dir,
        "specjbb.csv",
        "# Test general meta start\n\
         # Results version: v1.1.2743\n\
         # Test general meta end\n\
         Warehouses:Bops\n\
         1,1000\n\
         2,1900\n\
         Warehouses:Bops\n\
         1,5\n",
    );
    let config = PipelineConfig::default();
    let pricing = pricing(2.0);
    let pipeline = Pipeline::new(&config, &pricing);

    let set = pipeline
        .extract(Suite::SpecJbb, &path, "node-1")
        .unwrap()
        .unwrap();
    assert_eq!(set.csv_version(), "v1.1.2743");
    let rows: Vec<_> = set.data_rows().map(|r| r.cells.clone()).collect();
    assert_eq!(rows, vec![row!["1", "1000"], row!["2", "1900"]]);

    let summary = pipeline.summarize(Suite::SpecJbb, &[set]);
    let peak = position(&summary, &row!["Peak", "Thrput-RHEL"]);
    assert_eq!(summary[peak + 1], row!["node-1", 1900.0]);
    let efficiency = position(&summary, &row!["Peak/$eff", "Price-perf-RHEL"]);
    assert_eq!(summary[efficiency + 1], row!["node-1", 950.0]);
    let first = position(&summary, &row!["1", "1000", "v1.1.2743"]);
    assert_eq!(summary[first + 1], row!["2", "1900"]);
}

#[test]
fn test_unknown_version_falls_back_to_default_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(
        &dir,
        "results.csv",
        "# Test general meta start\n\
         # Results version: 9.4\n\
         # Test general meta end\n\
         N:Gflops\n\
         1:7.5\n",
    );
    let config = PipelineConfig::default();
    let pricing = pricing(1.0);
    let pipeline = Pipeline::new(&config, &pricing);

    let version = pipeline.resolve_version(Suite::Linpack, &path);
    assert_eq!(version.normalized, "9.4");
    let set = pipeline
        .extract(Suite::Linpack, &path, "node-1")
        .unwrap()
        .unwrap();
    assert_eq!(linpack::gflops(&set), Some(7.5));
}

#[test]
fn test_bad_file_is_reported_and_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let good = fixture(&dir, "good.csv", "A:B:Gflops\n1:2:3.5\n");
    let bad = fixture(&dir, "bad.csv", "A:B:Gflops\n1:2\n");
    let ignored = fixture(&dir, "notes.txt", "Gflops\n1.0\n");
    let config = PipelineConfig::default();
    let pricing = pricing(1.0);
    let pipeline = Pipeline::new(&config, &pricing);

    assert!(matches!(
        pipeline.extract(Suite::Linpack, &bad, "node-2"),
        Err(Error::SchemaMismatch { header: 3, data: 2 })
    ));

    let inputs = vec![
        RunInput::new("node-1", &good),
        RunInput::new("node-2", &bad),
        RunInput::new("node-3", &ignored),
    ];
    let mut sink = RecordingSink::default();
    let report = pipeline.run(Suite::Linpack, &inputs, &mut sink).unwrap();

    assert_eq!(report.extracted, 1);
    assert_eq!(report.skipped, vec![ignored]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, bad);
    assert_eq!(sink.appended.len(), 1);
}

#[test]
fn test_aws_systems_grouped_and_sized() {
    let dir = tempfile::tempdir().unwrap();
    let content = "N:Gflops\n1:100.0\n";
    let inputs = vec![
        RunInput::new("m5.4xlarge", fixture(&dir, "a.csv", content)),
        RunInput::new("c5.2xlarge", fixture(&dir, "b.csv", content)),
        RunInput::new("m5.2xlarge", fixture(&dir, "c.csv", content)),
    ];
    let config = PipelineConfig {
        provider: Provider::Aws,
        ..PipelineConfig::default()
    };
    let pricing = pricing(1.0);
    let pipeline = Pipeline::new(&config, &pricing);

    let mut sink = RecordingSink::default();
    pipeline.run(Suite::Linpack, &inputs, &mut sink).unwrap();
    let rows = &sink.appended[0].1;

    let systems: Vec<&str> = rows
        .iter()
        .filter(|r| r.len() == 3 && r[2] == perfsheet_core::Cell::from("1.0"))
        .filter_map(|r| r[0].as_str())
        .collect();
    assert_eq!(systems, vec!["c5.2xlarge", "m5.2xlarge", "m5.4xlarge"]);
    assert_eq!(rows.iter().filter(|r| **r == row!["Gflops"]).count(), 2);
}

#[test]
fn test_etcd_run_directory() {
    let dir = tempfile::tempdir().unwrap();
    for (run, latency) in [("run-2", "2.5"), ("run-1", "1.5")] {
        let run_dir = dir.path().join(run);
        fs::create_dir_all(&run_dir).unwrap();
        fs::write(
            run_dir.join("result_etcd.csv"),
            format!("Ops:Latency\nput:{}\n", latency),
        )
        .unwrap();
    }
    let config = PipelineConfig::default();
    let pricing = pricing(1.0);
    let pipeline = Pipeline::new(&config, &pricing);

    let mut sink = RecordingSink::default();
    let inputs = [RunInput::new("node-1", dir.path())];
    let report = pipeline.run(Suite::Etcd, &inputs, &mut sink).unwrap();
    assert_eq!(report.extracted, 1);

    let rows = &sink.appended[0].1;
    assert_eq!(
        rows,
        &vec![
            row!["node-1"],
            row!["Run", "Ops-RHEL", "Latency-RHEL", "CSV Version"],
            row!["run-1", "put", "1.5", "1.0"],
            row!["run-2", "put", "2.5"],
            row![""],
        ]
    );
}

#[test]
fn test_speccpu_without_sub_suite_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let content = "Benchmarks:Base Rate\n500.perlbench_r:10.2\n";
    let path = fixture(&dir, "results.csv", content);
    let config = PipelineConfig::default();
    let pricing = pricing(1.0);
    let pipeline = Pipeline::new(&config, &pricing);
    assert!(pipeline
        .extract(Suite::SpecCpu, Path::new(&path), "node-1")
        .unwrap()
        .is_none());

    let intrate = dir.path().join("intrate");
    fs::create_dir_all(&intrate).unwrap();
    let path = intrate.join("results.csv");
    let content = "Benchmarks:Base copies:Base Rate\n500.perlbench_r:4:10.2\n";
    fs::write(&path, content).unwrap();
    let set = pipeline
        .extract(Suite::SpecCpu, &path, "node-1")
        .unwrap()
        .unwrap();
    assert_eq!(set.identity().suite.as_deref(), Some("intrate"));
    assert_eq!(
        set.data_rows().next().unwrap().cells,
        row!["500.perlbench_r", "10.2"]
    );
}

#[test]
fn test_speccpu_summary_layout() {
    let dir = tempfile::tempdir().unwrap();
    let mut inputs = Vec::new();
    for (suite, rate) in [("fprate", "10.2"), ("intrate", "8.4")] {
        let suite_dir = dir.path().join(suite);
        fs::create_dir_all(&suite_dir).unwrap();
        let path = suite_dir.join("results.csv");
        fs::write(
            &path,
            format!(
                "Benchmarks:Base copies:Base Rate\n\
                 500.perlbench_r:4:{rate}\n\
                 502.gcc_r:4:12.5\n"
            ),
        )
        .unwrap();
        inputs.push(RunInput::new("node-1", path));
    }
    let config = PipelineConfig::default();
    let pricing = pricing(1.0);
    let pipeline = Pipeline::new(&config, &pricing);

    let mut sink = RecordingSink::default();
    let report = pipeline.run(Suite::SpecCpu, &inputs, &mut sink).unwrap();
    assert_eq!(report.extracted, 2);

    let (destination, rows) = &sink.appended[0];
    assert_eq!(destination, "speccpu");
    assert_eq!(
        rows,
        &vec![
            row!["node-1", "fprate"],
            row!["Benchmark", "Base_Rate-RHEL", "CSV Version"],
            row!["500.perlbench_r", "10.2", "1.0"],
            row!["502.gcc_r", "12.5"],
            row![""],
            row!["node-1", "intrate"],
            row!["Benchmark", "Base_Rate-RHEL", "CSV Version"],
            row!["500.perlbench_r", "8.4", "1.0"],
            row!["502.gcc_r", "12.5"],
            row![""],
        ]
    );
}

#[test]
fn test_coremark_pro_summary_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(
        &dir,
        "coremark_pro.csv",
        "Test:Multi iterations:Single iterations:Scaling\n\
         cjpeg-rose7-preset:120:30:4\n\
         Score:200:50\n",
    );
    let config = PipelineConfig::default();
    let pricing = pricing(2.0);
    let pipeline = Pipeline::new(&config, &pricing);

    let mut sink = RecordingSink::default();
    let inputs = [RunInput::new("m5.xlarge", &path)];
    pipeline.run(Suite::CoremarkPro, &inputs, &mut sink).unwrap();

    let (destination, rows) = &sink.appended[0];
    assert_eq!(destination, "coremark_pro");
    assert_eq!(
        rows,
        &vec![
            row!["Single Iterations"],
            row!["System name", "Score-RHEL", "CSV Version"],
            row!["m5.xlarge", 50.0, "1.0"],
            row![""],
            row!["Multi Iterations"],
            row!["System name", "Score-RHEL"],
            row!["m5.xlarge", 200.0],
            row![""],
            row!["Cost/Hr"],
            row!["System name", "Cost/Hr"],
            row!["m5.xlarge", 2.0],
            row![""],
            row!["Single Iterations Price-perf"],
            row!["System name", "Score/$-RHEL"],
            row!["m5.xlarge", 25.0],
            row![""],
            row!["Multi Iterations Price-perf"],
            row!["System name", "Score/$-RHEL"],
            row!["m5.xlarge", 100.0],
            row![""],
            row!["Single Iterations Details"],
            row!["Test", "Score-RHEL"],
            row!["cjpeg-rose7-preset", 30.0],
            row![""],
            row!["Multi Iterations Details"],
            row!["Test", "Score-RHEL"],
            row!["cjpeg-rose7-preset", 120.0],
            row![""],
        ]
    );
}

#[test]
fn test_coremark_pro_keeps_input_order_without_prices() {
    let dir = tempfile::tempdir().unwrap();
    let content = "Test:Multi iterations:Single iterations\nScore:200:50\n";
    let config = PipelineConfig::default();
    let pricing = unpriced();
    let pipeline = Pipeline::new(&config, &pricing);

    let mut sets = Vec::new();
    for (system, name) in [("m5.4xlarge", "a.csv"), ("c5.xlarge", "b.csv")] {
        let path = fixture(&dir, name, content);
        let set = pipeline
            .extract(Suite::CoremarkPro, &path, system)
            .unwrap()
            .unwrap();
        sets.push(set);
    }
    let summary = pipeline.summarize(Suite::CoremarkPro, &sets);

    let first = position(&summary, &row!["m5.4xlarge", 50.0, "1.0"]);
    let second = position(&summary, &row!["c5.xlarge", 50.0, "1.0"]);
    assert!(first < second);

    let cost = position(&summary, &row!["System name", "Cost/Hr"]);
    assert_eq!(summary[cost + 1], row!["m5.4xlarge", None::<f64>]);
    let per_dollar = position(&summary, &row!["Single Iterations Price-perf"]);
    assert_eq!(summary[per_dollar + 2], row!["m5.4xlarge", 0.0]);
}
