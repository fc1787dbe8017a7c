//! Run configuration, loaded from `perfwatch.toml`.
//!
//! Every field has a default, so an absent file (or an empty one) yields a
//! working configuration: the Yahoo provider, a 400-day trailing window and
//! the row-offset lookback basis.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{
    CsvDirProvider, FetchError, MarketDataProvider, SyntheticProvider, YahooProvider,
};
use crate::performance::PerformanceSettings;

pub const DEFAULT_CONFIG_FILE: &str = "perfwatch.toml";

/// Longest accepted trailing window: one hundred years.
pub const MAX_TRAILING_DAYS: u32 = 36_525;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Date range requested from the provider for every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateWindow {
    /// `[today - days, today]`
    Trailing { days: u32 },
    /// Explicit inclusive range.
    Fixed { start: NaiveDate, end: NaiveDate },
}

impl Default for DateWindow {
    fn default() -> Self {
        // 400 calendar days comfortably covers 253 trading rows
        DateWindow::Trailing { days: 400 }
    }
}

impl DateWindow {
    /// Concrete `(start, end)` for a run on `today`.
    ///
    /// A trailing start before the earliest representable date saturates to it.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            DateWindow::Trailing { days } => {
                let start = today
                    .checked_sub_days(Days::new(u64::from(days)))
                    .unwrap_or(NaiveDate::MIN);
                (start, today)
            }
            DateWindow::Fixed { start, end } => (start, end),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            DateWindow::Trailing { days: 0 } => {
                Err(ConfigError::Invalid("window.days must be positive".into()))
            }
            DateWindow::Trailing { days } if days > MAX_TRAILING_DAYS => {
                Err(ConfigError::Invalid(format!(
                    "window.days {days} exceeds the maximum of {MAX_TRAILING_DAYS}"
                )))
            }
            DateWindow::Fixed { start, end } if start > end => Err(ConfigError::Invalid(format!(
                "window.start {start} is after window.end {end}"
            ))),
            _ => Ok(()),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Which market-data provider to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    Yahoo {
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    CsvDir {
        dir: PathBuf,
    },
    Synthetic {
        /// Symbols that report "not found".
        #[serde(default)]
        fail_symbols: Vec<String>,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Yahoo {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn build(&self) -> Result<Box<dyn MarketDataProvider>, FetchError> {
        Ok(match self {
            ProviderConfig::Yahoo { timeout_secs } => {
                Box::new(YahooProvider::new(Duration::from_secs(*timeout_secs))?)
            }
            ProviderConfig::CsvDir { dir } => Box::new(CsvDirProvider::new(dir.clone())),
            ProviderConfig::Synthetic { fail_symbols } => {
                Box::new(SyntheticProvider::new().with_failing(fail_symbols.iter().cloned()))
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub file: String,
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file: "historical_performance.log".into(),
            level: "info".into(),
        }
    }
}

impl LoggingConfig {
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

/// An output target for the aggregated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sink {
    /// Flat `performance.csv`.
    Csv,
    /// One SVG per window plus the grouped main chart.
    Charts,
    /// `interactive.html` with a window selector.
    Interactive,
    /// `manifest.json` describing the run.
    Manifest,
}

impl Sink {
    pub const ALL: [Sink; 4] = [Sink::Csv, Sink::Charts, Sink::Interactive, Sink::Manifest];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub sinks: Vec<Sink>,
    pub top_n: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sinks: Sink::ALL.to_vec(),
            top_n: 5,
        }
    }
}

impl OutputConfig {
    pub fn enabled(&self, sink: Sink) -> bool {
        self.sinks.contains(&sink)
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: PathBuf,
    pub output_dir: PathBuf,
    pub window: DateWindow,
    pub performance: PerformanceSettings,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("data/symbol_mapping.csv"),
            output_dir: PathBuf::from("output"),
            window: DateWindow::default(),
            performance: PerformanceSettings::default(),
            provider: ProviderConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        if self.output.top_n == 0 {
            return Err(ConfigError::Invalid("output.top_n must be positive".into()));
        }
        if self.logging.file.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.file must not be empty".into()));
        }
        Ok(())
    }
}
