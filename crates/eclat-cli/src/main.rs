#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
//! `eclat` - frequent-itemset miner
//!
//! Usage:
//!   `eclat -H`
//!   `eclat -d retail.dat -m 0.01 -s`
//!   `eclat -d retail.dat -m 0.05 -p --format json`

mod instrument;
#[cfg(test)]
mod instrument_tests;
mod report;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use eclat_core::{
    mine_transactions_with, AdaptiveBitset, BackendKind, Bitset, DenseBitset, EclatConfig,
    RoaringBitmap, TracingObserver, TransactionSet,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::instrument::{Instruments, Recording};
use crate::report::PatternFormat;

#[derive(Parser, Debug)]
#[command(name = "eclat")]
#[command(author, version, about = "Eclat frequent-itemset miner over vertical bitsets")]
struct Cli {
    /// Dataset file: one transaction per line, items separated by spaces, commas or tabs
    #[arg(short, long, value_name = "FILE")]
    dataset: Option<PathBuf>,

    /// Fraction of transactions to process from the start [default: 1.0]
    #[arg(short, long, value_parser = positive_fraction)]
    fraction: Option<f64>,

    /// Print the CSV header
    #[arg(short = 'H', long)]
    header: bool,

    /// Minimum support as a fraction of the transactions [default: 0.1]
    #[arg(short, long, value_parser = positive_fraction)]
    min_support: Option<f64>,

    /// Print the frequent itemsets
    #[arg(short, long)]
    patterns: bool,

    /// Print the CSV statistics row
    #[arg(short, long)]
    stats: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Bitset backend (roaring, dense, adaptive) [default: roaring]
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Configuration file [default: eclat.toml if present]
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pattern output format
    #[arg(long, value_enum, default_value_t = PatternFormat::Tree)]
    format: PatternFormat,
}

fn positive_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("invalid number {s}"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("invalid value {s}, must be > 0"));
    }
    Ok(value)
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version print to stdout and succeed, everything else is a usage error
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if !cli.header && cli.dataset.is_none() {
        let _ = Cli::command().write_help(&mut io::stderr());
        std::process::exit(1);
    }

    let config = load_config(&cli)?;
    init_logging(&cli, &config)?;

    let instruments = Instruments::discover();
    if cli.header {
        println!("{}", report::header_line(&instruments));
    }

    if let Some(dataset) = &cli.dataset {
        match config.mining.backend {
            BackendKind::Roaring => run::<RoaringBitmap>(&cli, dataset, &config, &instruments)?,
            BackendKind::Dense => run::<DenseBitset>(&cli, dataset, &config, &instruments)?,
            BackendKind::Adaptive => run::<AdaptiveBitset>(&cli, dataset, &config, &instruments)?,
        }
    }

    Ok(())
}

/// Config file, then environment, then command-line flags.
fn load_config(cli: &Cli) -> anyhow::Result<EclatConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            anyhow::ensure!(path.is_file(), "config file {} not found", path.display());
            EclatConfig::load_from_path(path)?
        }
        None => EclatConfig::load()?,
    };

    if let Some(min_support) = cli.min_support {
        config.mining.min_support = min_support;
    }
    if let Some(fraction) = cli.fraction {
        config.mining.fraction = fraction;
    }
    if let Some(backend) = cli.backend {
        config.mining.backend = backend;
    }
    if cli.verbose {
        config.logging.level = "info".to_string();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(cli: &Cli, config: &EclatConfig) -> anyhow::Result<()> {
    let level: Level = config
        .logging
        .level
        .parse()
        .with_context(|| format!("invalid log level {}", config.logging.level))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.verbose {
        tracing::info!(backend = %config.mining.backend, "verbose logging enabled");
    }
    Ok(())
}

fn run<B: Bitset>(
    cli: &Cli,
    dataset: &Path,
    config: &EclatConfig,
    instruments: &Instruments,
) -> anyhow::Result<()> {
    tracing::info!(
        fraction_pct = config.mining.fraction * 100.0,
        dataset = %dataset.display(),
        "reading input"
    );
    let transactions = TransactionSet::from_path(dataset, config.mining.fraction)
        .with_context(|| format!("can not read dataset {}", dataset.display()))?;
    tracing::info!(transactions = transactions.len(), "read transactions");

    let recording = cli.stats.then(|| instruments.start());
    let outcome = mine_transactions_with::<B>(
        transactions,
        &config.mining,
        &config.limits,
        &mut TracingObserver,
    )?;
    let measurement = recording.map(Recording::stop);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.patterns {
        report::write_patterns(&outcome.tree, cli.format, &mut out)?;
    }
    if let Some(measurement) = measurement {
        writeln!(
            out,
            "{}",
            report::stats_line(&measurement, &outcome.tree.summary())
        )?;
    }
    out.flush()?;
    Ok(())
}
