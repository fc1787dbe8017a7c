//! Where the dashboard's rows come from.
//!
//! Either a previously exported `performance.csv`, or a fresh pipeline run
//! driven by `perfwatch.toml` (defaults when the file is absent). Both run
//! before the terminal is switched to raw mode, so errors print normally.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use perfwatch_core::config::DEFAULT_CONFIG_FILE;
use perfwatch_core::fetch_log::{FetchOutcome, TeeFetchLog};
use perfwatch_core::{
    aggregate, load_catalog, AggregateOptions, AppConfig, MemoryFetchLog, PerformanceRow,
    TracingFetchLog,
};
use perfwatch_report::read_table_csv;

/// Terminal dashboard over investment performance.
#[derive(Parser, Debug)]
#[command(name = "perfwatch-tui")]
pub struct TuiArgs {
    /// Exported performance CSV to browse instead of fetching.
    #[arg(conflicts_with = "config")]
    pub csv: Option<PathBuf>,

    /// Fetch with this config file (default: perfwatch.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl TuiArgs {
    pub fn row_source(&self) -> RowSource {
        match (&self.csv, &self.config) {
            (Some(csv), _) => RowSource::Csv(csv.clone()),
            (None, Some(config)) => RowSource::Pipeline {
                config: config.clone(),
            },
            (None, None) => RowSource::Pipeline {
                config: PathBuf::from(DEFAULT_CONFIG_FILE),
            },
        }
    }
}

/// Where the dashboard's rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSource {
    /// Read an exported table.
    Csv(PathBuf),
    /// Run the pipeline from a config file.
    Pipeline { config: PathBuf },
}

/// Rows plus a short description of their origin.
#[derive(Debug)]
pub struct LoadedRows {
    pub rows: Vec<PerformanceRow>,
    pub label: String,
    pub top_n: usize,
    /// `(symbol, reason)` for every entry that produced no data.
    pub failures: Vec<(String, String)>,
}

pub fn load_csv(path: &Path, top_n: usize) -> Result<LoadedRows> {
    let table = read_table_csv(path)?;
    tracing::info!(path = %path.display(), rows = table.len(), "loaded performance table");
    Ok(LoadedRows {
        rows: table.rows,
        label: path.display().to_string(),
        top_n,
        failures: Vec::new(),
    })
}

/// Run catalog → provider → aggregate with `config`.
pub fn run_pipeline(config: &AppConfig, today: NaiveDate) -> Result<LoadedRows> {
    let catalog = load_catalog(&config.catalog)
        .with_context(|| format!("failed to load catalog {}", config.catalog.display()))?;
    let provider = config
        .provider
        .build()
        .context("failed to set up market-data provider")?;

    let memory = MemoryFetchLog::new();
    let log = TeeFetchLog::new(&TracingFetchLog, &memory);
    let table = aggregate(
        &catalog,
        provider.as_ref(),
        &log,
        &AggregateOptions::from(config),
        today,
    );

    let failures = memory
        .outcomes()
        .into_iter()
        .filter_map(|(symbol, outcome)| match outcome {
            FetchOutcome::Failed(e) => Some((symbol, e.to_string())),
            _ => None,
        })
        .collect();

    Ok(LoadedRows {
        rows: table.rows,
        label: format!("{} via {}", config.catalog.display(), provider.name()),
        top_n: config.output.top_n,
        failures,
    })
}
