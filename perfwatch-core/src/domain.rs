//! Domain types shared by every crate in the workspace.
//!
//! - Catalog entries (name + ticker symbol)
//! - Price series (ascending adjusted closes for one symbol)
//! - Lookback windows and the per-entry performance row

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One investment to track, as listed in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub symbol: String,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// A single daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::CsvImport => "csv_import",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// Adjusted-close series for one symbol, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
    pub source: DataSource,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Adjusted closes in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.adj_close).collect()
    }
}

/// Lookback window for a performance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    OneMonth,
    ThreeMonth,
    SixMonth,
    OneYear,
}

impl Window {
    pub const ALL: [Window; 4] = [
        Window::OneMonth,
        Window::ThreeMonth,
        Window::SixMonth,
        Window::OneYear,
    ];

    /// Position in [`Window::ALL`].
    pub fn index(self) -> usize {
        match self {
            Window::OneMonth => 0,
            Window::ThreeMonth => 1,
            Window::SixMonth => 2,
            Window::OneYear => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Window::ALL.get(i).copied()
    }

    /// Number of rows back from the last observation (row-offset basis).
    pub fn row_offset(self) -> usize {
        match self {
            Window::OneMonth => 1,
            Window::ThreeMonth => 3,
            Window::SixMonth => 6,
            Window::OneYear => 252,
        }
    }

    /// Number of calendar months back from the last observation (calendar basis).
    pub fn months(self) -> u32 {
        match self {
            Window::OneMonth => 1,
            Window::ThreeMonth => 3,
            Window::SixMonth => 6,
            Window::OneYear => 12,
        }
    }

    /// Column header used in exports and charts.
    pub fn label(self) -> &'static str {
        match self {
            Window::OneMonth => "1 Month Performance",
            Window::ThreeMonth => "3 Month Performance",
            Window::SixMonth => "6 Month Performance",
            Window::OneYear => "1 Year Performance",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Window::OneMonth => "1 Month",
            Window::ThreeMonth => "3 Month",
            Window::SixMonth => "6 Month",
            Window::OneYear => "1 Year",
        }
    }

    /// Short key used in file names and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Window::OneMonth => "1m",
            Window::ThreeMonth => "3m",
            Window::SixMonth => "6m",
            Window::OneYear => "1y",
        }
    }

    pub fn next(self) -> Window {
        Window::ALL[(self.index() + 1) % Window::ALL.len()]
    }

    pub fn prev(self) -> Window {
        Window::ALL[(self.index() + Window::ALL.len() - 1) % Window::ALL.len()]
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_label())
    }
}

/// Four metric values in [`Window::ALL`] order. `None` means unavailable.
pub type MetricValues = [Option<f64>; 4];

/// One output row per catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    #[serde(rename = "Investment Name")]
    pub name: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "1 Month Performance")]
    pub perf_1m: Option<f64>,
    #[serde(rename = "3 Month Performance")]
    pub perf_3m: Option<f64>,
    #[serde(rename = "6 Month Performance")]
    pub perf_6m: Option<f64>,
    #[serde(rename = "1 Year Performance")]
    pub perf_1y: Option<f64>,
}

impl PerformanceRow {
    pub fn new(entry: &CatalogEntry, values: MetricValues) -> Self {
        Self {
            name: entry.name.clone(),
            symbol: entry.symbol.clone(),
            perf_1m: values[0],
            perf_3m: values[1],
            perf_6m: values[2],
            perf_1y: values[3],
        }
    }

    /// Row for an entry whose fetch or computation failed.
    pub fn failed(entry: &CatalogEntry) -> Self {
        Self::new(entry, [None; 4])
    }

    pub fn get(&self, window: Window) -> Option<f64> {
        match window {
            Window::OneMonth => self.perf_1m,
            Window::ThreeMonth => self.perf_3m,
            Window::SixMonth => self.perf_6m,
            Window::OneYear => self.perf_1y,
        }
    }

    pub fn values(&self) -> MetricValues {
        [self.perf_1m, self.perf_3m, self.perf_6m, self.perf_1y]
    }

    /// True when every metric is missing (the entry failed).
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }
}

/// The aggregated table, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceTable {
    pub rows: Vec<PerformanceRow>,
}

impl PerformanceTable {
    pub fn new(rows: Vec<PerformanceRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Symbols whose rows carry no metrics at all.
    pub fn failed_symbols(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.is_empty())
            .map(|r| r.symbol.as_str())
            .collect()
    }
}
