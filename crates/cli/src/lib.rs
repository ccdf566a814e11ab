// Copyright 2025 Perfsheet Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for perfsheet.
//!
//! This crate provides the `perfsheet` command: `process` ingests result
//! files of one suite and writes the summary, `version` inspects a result
//! file's version metadata and `status` shows the effective configuration.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use perfsheet_adapters::{ConfigAdapter, CsvSink, JsonSink, MarkdownSink, NoPricing, PriceTable};
use perfsheet_benchmarks::{Pipeline, RunInput, Suite};
use perfsheet_core::{PricingLookup, RowSink, VersionInfo};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Benchmark result ingestion and price-performance summaries.
#[derive(Parser, Debug)]
#[command(name = "perfsheet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose (debug) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Summary output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `<suite>.csv` per suite in the output directory.
    Csv,
    /// Markdown tables on standard output.
    Markdown,
    /// One `<suite>.json` per suite in the output directory.
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest result files of one suite and write its summary.
    Process {
        /// Benchmark suite (linpack, speccpu, coremark_pro, specjbb, etcd).
        #[arg(short, long)]
        suite: Suite,

        /// Result input as SYSTEM=PATH; repeat for every system.
        #[arg(short, long = "run", value_name = "SYSTEM=PATH", required = true)]
        runs: Vec<RunInput>,

        /// Configuration file (INI, TOML, ...).
        #[arg(short, long, env = "PERFSHEET_CONFIG")]
        config: Option<PathBuf>,

        /// TOML price sheet; without it no costs are reported.
        #[arg(short, long)]
        prices: Option<PathBuf>,

        /// Output directory for file formats.
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Show the results version and metadata of a file.
    Version {
        /// Result file to inspect.
        file: PathBuf,
    },

    /// Show the effective configuration.
    Status {
        /// Configuration file (INI, TOML, ...).
        #[arg(short, long, env = "PERFSHEET_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Install the global log subscriber.
///
/// `RUST_LOG` wins when set; otherwise perfsheet logs at `info`, or
/// `debug` with `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "perfsheet=debug"
    } else {
        "perfsheet=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    execute(cli.command)
}

/// Execute a parsed command.
pub fn execute(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Process {
            suite,
            runs,
            config,
            prices,
            output,
            format,
        } => process(
            suite,
            &runs,
            config.as_deref(),
            prices.as_deref(),
            &output,
            format,
        ),
        Commands::Version { file } => {
            if !file.is_file() {
                bail!("no such file: {}", file.display());
            }
            let version = VersionInfo::from_path(&file);
            println!("File: {}", file.display());
            let raw = version.raw.as_deref().unwrap_or("(none)");
            println!("Raw version: {}", raw);
            println!("Normalized version: {}", version.normalized);
            if !version.metadata.is_empty() {
                println!("\nMetadata:");
                for (key, value) in &version.metadata {
                    println!("  {}: {}", key, value);
                }
            }
            Ok(())
        }
        Commands::Status { config } => {
            let adapter = ConfigAdapter::load(config.as_deref())?;
            let config = adapter.pipeline_config()?;
            println!("perfsheet {}", env!("CARGO_PKG_VERSION"));
            println!("\nConfiguration:");
            println!("  cloud.cloud_type: {}", config.provider);
            println!("  cloud.region:     {}", config.region);
            println!("  test.os_type:     {}", config.os_type);
            println!("  test.os_release:  {}", config.os_release);
            println!("\nSuites:");
            for suite in Suite::all() {
                println!(
                    "  - {} (versions: {})",
                    suite,
                    suite.registry().versions().join(", ")
                );
            }
            Ok(())
        }
    }
}

fn process(
    suite: Suite,
    runs: &[RunInput],
    config: Option<&Path>,
    prices: Option<&Path>,
    output: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let adapter = ConfigAdapter::load(config)?;
    let config = adapter.pipeline_config()?;

    let table;
    let pricing: &dyn PricingLookup = match prices {
        Some(path) => {
            table = PriceTable::load(path)
                .with_context(|| format!("loading price sheet {}", path.display()))?;
            &table
        }
        None => {
            warn!("no price sheet given, costs will be empty");
            &NoPricing
        }
    };

    let mut sink: Box<dyn RowSink> = match format {
        OutputFormat::Csv => Box::new(CsvSink::new(output)),
        OutputFormat::Markdown => Box::new(MarkdownSink::new(std::io::stdout())),
        OutputFormat::Json => Box::new(JsonSink::new(output)),
    };

    let pipeline = Pipeline::new(&config, pricing);
    let report = pipeline.run(suite, runs, sink.as_mut())?;
    info!(
        suite = %suite,
        extracted = report.extracted,
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "run complete"
    );

    for (path, reason) in &report.failed {
        eprintln!("failed: {}: {}", path.display(), reason);
    }
    if report.extracted == 0 && !report.failed.is_empty() {
        bail!("no results could be extracted for {}", suite);
    }
    if format != OutputFormat::Markdown && report.rows > 0 {
        println!(
            "Wrote {} rows for {} to {}",
            report.rows,
            suite,
            output.display()
        );
    }

    Ok(())
}
