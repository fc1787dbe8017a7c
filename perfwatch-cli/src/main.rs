//! perfwatch CLI: fetch, report and inspection commands.
//!
//! Commands:
//! - `fetch`: run catalog → provider → metrics and write the artifact bundle
//! - `report`: rebuild charts and the HTML dashboard from an exported CSV
//! - `top`: print the top-N investments for one window
//! - `catalog`: validate and list a symbol catalog
//! - `init-config`: write a default `perfwatch.toml`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use perfwatch_core::config::{OutputConfig, DEFAULT_CONFIG_FILE};
use perfwatch_core::fetch_log::{StdoutFetchLog, TeeFetchLog};
use perfwatch_core::logging::init_file_logging;
use perfwatch_core::{
    aggregate, load_catalog, AggregateOptions, AppConfig, DateWindow, FetchLog, LookbackBasis,
    ProviderConfig, Sink, TracingFetchLog, Window,
};
use perfwatch_report::svg::format_pct;
use perfwatch_report::{read_table_csv, save_artifacts, top_n, RunInfo};

#[derive(Parser)]
#[command(
    name = "perfwatch",
    about = "perfwatch: historical performance of an investment list"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prices, compute 1m/3m/6m/1y performance and write all outputs.
    Fetch(FetchArgs),
    /// Rebuild charts and the interactive page from an exported CSV.
    Report {
        /// Exported performance CSV.
        input: PathBuf,

        /// Where to write the charts. Defaults to the CSV's directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Rows in each top table.
        #[arg(long, default_value_t = perfwatch_report::DEFAULT_TOP_N)]
        top: usize,
    },
    /// Print the best investments for one window.
    Top {
        /// Exported performance CSV.
        input: PathBuf,

        /// Performance window.
        #[arg(long, value_enum, default_value = "1m")]
        window: WindowArg,

        /// Number of rows.
        #[arg(short, long, default_value_t = perfwatch_report::DEFAULT_TOP_N)]
        n: usize,
    },
    /// Validate a symbol catalog and list its entries.
    Catalog {
        /// Catalog CSV. Defaults to the configured catalog.
        path: Option<PathBuf>,

        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Write a config file with every default spelled out.
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderKind {
    Yahoo,
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum WindowArg {
    #[value(name = "1m")]
    OneMonth,
    #[value(name = "3m")]
    ThreeMonth,
    #[value(name = "6m")]
    SixMonth,
    #[value(name = "1y", alias = "12m")]
    OneYear,
}

impl From<WindowArg> for Window {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::OneMonth => Window::OneMonth,
            WindowArg::ThreeMonth => Window::ThreeMonth,
            WindowArg::SixMonth => Window::SixMonth,
            WindowArg::OneYear => Window::OneYear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BasisArg {
    Rows,
    Calendar,
}

impl From<BasisArg> for LookbackBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Rows => LookbackBasis::Rows,
            BasisArg::Calendar => LookbackBasis::Calendar,
        }
    }
}

/// Flags for `fetch`; every one overrides the config file.
#[derive(Args, Debug)]
struct FetchArgs {
    /// Config file. Missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Symbol catalog CSV (Investment Name, Symbol).
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Start date (YYYY-MM-DD). Requires --end.
    #[arg(long, requires = "end")]
    start: Option<String>,

    /// End date (YYYY-MM-DD). Requires --start.
    #[arg(long, requires = "start")]
    end: Option<String>,

    /// Trailing window in calendar days ending today.
    #[arg(long, conflicts_with_all = ["start", "end"])]
    days: Option<u32>,

    /// Market-data provider.
    #[arg(long, value_enum)]
    provider: Option<ProviderKind>,

    /// Read prices from <DIR>/<SYMBOL>.csv instead of a live provider.
    #[arg(long, conflicts_with = "provider")]
    prices_dir: Option<PathBuf>,

    /// Lookback basis: trading rows or calendar months.
    #[arg(long, value_enum)]
    basis: Option<BasisArg>,

    /// Treat missing history for any window as a failed row.
    #[arg(long, default_value_t = false)]
    strict_history: bool,

    /// Only log to the log file, no per-symbol progress on stdout.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch(args) => run_fetch(&args),
        Commands::Report {
            input,
            output_dir,
            top,
        } => run_report(&input, output_dir, top),
        Commands::Top { input, window, n } => run_top(&input, window.into(), n),
        Commands::Catalog { path, config } => run_catalog(path, &config),
        Commands::InitConfig { path, force } => run_init_config(&path, force),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Fold command-line flags into the loaded config.
fn apply_overrides(config: &mut AppConfig, args: &FetchArgs) -> Result<()> {
    if let Some(catalog) = &args.catalog {
        config.catalog = catalog.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let (Some(start), Some(end)) = (&args.start, &args.end) {
        config.window = DateWindow::Fixed {
            start: parse_date(start)?,
            end: parse_date(end)?,
        };
    }
    if let Some(days) = args.days {
        config.window = DateWindow::Trailing { days };
    }
    match (args.provider, &args.prices_dir) {
        (Some(ProviderKind::Yahoo), _) => {
            // keep a configured timeout if yahoo was already selected
            if !matches!(config.provider, ProviderConfig::Yahoo { .. }) {
                config.provider = ProviderConfig::default();
            }
        }
        (Some(ProviderKind::Synthetic), _) => {
            config.provider = ProviderConfig::Synthetic {
                fail_symbols: Vec::new(),
            }
        }
        (None, Some(dir)) => config.provider = ProviderConfig::CsvDir { dir: dir.clone() },
        (None, None) => {}
    }
    if let Some(basis) = args.basis {
        config.performance.basis = basis.into();
    }
    if args.strict_history {
        config.performance.strict_history = true;
    }
    config.validate()?;
    Ok(())
}

fn run_fetch(args: &FetchArgs) -> Result<()> {
    let mut config = AppConfig::load_or_default(&args.config)?;
    apply_overrides(&mut config, args)?;

    let log_path = init_file_logging(&config.logging)?;
    tracing::info!(config = %args.config.display(), "perfwatch fetch starting");

    let catalog = load_catalog(&config.catalog)
        .with_context(|| format!("failed to load catalog {}", config.catalog.display()))?;
    let provider = config
        .provider
        .build()
        .context("failed to set up market-data provider")?;

    let today = chrono::Local::now().date_naive();
    let options = AggregateOptions::from(&config);
    let (start, end) = options.window.resolve(today);
    println!(
        "Fetching {} investments from {} ({start} to {end}, {} basis)",
        catalog.len(),
        provider.name(),
        config.performance.basis.label(),
    );

    let stdout_log = StdoutFetchLog;
    let tee = TeeFetchLog::new(&TracingFetchLog, &stdout_log);
    let log: &dyn FetchLog = if args.quiet { &TracingFetchLog } else { &tee };
    let table = aggregate(&catalog, provider.as_ref(), log, &options, today);

    let run = RunInfo {
        catalog: config.catalog.clone(),
        provider: provider.name().to_string(),
        basis: config.performance.basis,
        start,
        end,
    };
    let paths = save_artifacts(&table, Some(&run), &config.output_dir, &config.output)?;

    let failed = table.failed_symbols();
    println!();
    println!("Rows: {} ({} without data)", table.len(), failed.len());
    if !failed.is_empty() {
        println!("No data for: {}", failed.join(", "));
    }
    for path in paths.all() {
        println!("Wrote {}", path.display());
    }
    println!("Log: {}", log_path.display());
    Ok(())
}

fn run_report(input: &Path, output_dir: Option<PathBuf>, top: usize) -> Result<()> {
    if top == 0 {
        bail!("--top must be positive");
    }
    let table = read_table_csv(input)?;
    let output_dir = output_dir.unwrap_or_else(|| {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let output = OutputConfig {
        sinks: vec![Sink::Charts, Sink::Interactive],
        top_n: top,
    };

    let paths = save_artifacts(&table, None, &output_dir, &output)?;
    for path in paths.all() {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_top(input: &Path, window: Window, n: usize) -> Result<()> {
    let table = read_table_csv(input)?;
    let leaders = top_n(&table.rows, window, n);

    println!("Top {n} Investments - {}", window.label());
    println!();
    if leaders.is_empty() {
        println!("No investment has a {} value.", window.short_label());
        return Ok(());
    }
    println!(
        "{:>3}  {:<36} {:<10} {:>10}",
        "#",
        "Investment Name",
        "Symbol",
        window.short_label()
    );
    println!("{}", "-".repeat(63));
    for (i, row) in leaders.iter().enumerate() {
        println!(
            "{:>3}  {:<36} {:<10} {:>10}",
            i + 1,
            row.name,
            row.symbol,
            format_pct(row.get(window))
        );
    }
    Ok(())
}

fn run_catalog(path: Option<PathBuf>, config: &Path) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => AppConfig::load_or_default(config)?.catalog,
    };
    let entries = load_catalog(&path)?;

    println!("Catalog: {}", path.display());
    println!("Entries: {}", entries.len());
    println!();
    println!("{:<10} {}", "Symbol", "Investment Name");
    println!("{}", "-".repeat(48));
    let mut seen = std::collections::HashSet::new();
    let mut duplicates = Vec::new();
    for entry in &entries {
        println!("{:<10} {}", entry.symbol, entry.name);
        if !seen.insert(entry.symbol.as_str()) {
            duplicates.push(entry.symbol.as_str());
        }
    }
    if !duplicates.is_empty() {
        println!();
        println!("Repeated symbols (each gets its own row): {}", duplicates.join(", "));
    }
    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let toml = AppConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
