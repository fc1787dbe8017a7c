//! Percentage-change performance metrics over the four lookback windows.
//!
//! Two bases are supported:
//! - **Rows** (default): the base observation is `k` rows before the last
//!   one, `k ∈ {1, 3, 6, 252}`. This is literal row arithmetic on whatever
//!   series was retrieved, so "1 month" is really "1 row".
//! - **Calendar**: the base observation is the last one dated on or before
//!   `last_date - N months`, `N ∈ {1, 3, 6, 12}`.
//!
//! A window that cannot be computed yields `None` for that metric only,
//! unless `strict_history` is set, in which case missing history fails the
//! whole entry.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::FetchError;
use crate::domain::{MetricValues, PriceSeries, Window};

/// How the base observation for a window is located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookbackBasis {
    #[default]
    Rows,
    Calendar,
}

impl LookbackBasis {
    pub fn label(self) -> &'static str {
        match self {
            LookbackBasis::Rows => "rows",
            LookbackBasis::Calendar => "calendar",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    pub basis: LookbackBasis,
    /// Treat a window without enough history as a failure of the whole entry.
    pub strict_history: bool,
}

/// Per-entry failures. None of these abort an aggregation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PerformanceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("empty price series for {symbol}")]
    EmptySeries { symbol: String },

    #[error("insufficient history for {window}: need {required} rows, have {available}")]
    InsufficientHistory {
        window: Window,
        required: usize,
        available: usize,
    },

    #[error("insufficient history for {window}: series starts {first}, base date {target}")]
    InsufficientCalendarHistory {
        window: Window,
        first: NaiveDate,
        target: NaiveDate,
    },

    #[error("invalid base price {price} for {window}")]
    InvalidBasePrice { window: Window, price: f64 },
}

impl PerformanceError {
    pub fn is_insufficient_history(&self) -> bool {
        matches!(
            self,
            PerformanceError::InsufficientHistory { .. }
                | PerformanceError::InsufficientCalendarHistory { .. }
        )
    }
}

/// Result of evaluating one series: the four values plus why any are missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub values: MetricValues,
    pub missing: Vec<(Window, PerformanceError)>,
    pub observations: usize,
}

impl Evaluation {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// `(last - base) / base * 100`.
pub fn percent_change(window: Window, base: f64, last: f64) -> Result<f64, PerformanceError> {
    if !base.is_finite() || base == 0.0 {
        return Err(PerformanceError::InvalidBasePrice {
            window,
            price: base,
        });
    }
    Ok((last - base) / base * 100.0)
}

/// Change from the observation `window.row_offset()` rows before the last one.
pub fn row_offset_change(closes: &[f64], window: Window) -> Result<f64, PerformanceError> {
    let k = window.row_offset();
    let n = closes.len();
    if n <= k {
        return Err(PerformanceError::InsufficientHistory {
            window,
            required: k + 1,
            available: n,
        });
    }
    percent_change(window, closes[n - 1 - k], closes[n - 1])
}

/// Change from the last observation dated on or before `last_date - months`.
pub fn calendar_change(series: &PriceSeries, window: Window) -> Result<f64, PerformanceError> {
    let (Some(first), Some(last)) = (series.points.first(), series.points.last()) else {
        return Err(PerformanceError::EmptySeries {
            symbol: series.symbol.clone(),
        });
    };

    let target = last
        .date
        .checked_sub_months(Months::new(window.months()))
        .unwrap_or(NaiveDate::MIN);

    // points are ascending, so the base is just before the first point past target
    let idx = series.points.partition_point(|p| p.date <= target);
    if idx == 0 {
        return Err(PerformanceError::InsufficientCalendarHistory {
            window,
            first: first.date,
            target,
        });
    }
    percent_change(window, series.points[idx - 1].adj_close, last.adj_close)
}

/// Change for one window under the given basis.
pub fn window_change(
    series: &PriceSeries,
    window: Window,
    basis: LookbackBasis,
) -> Result<f64, PerformanceError> {
    match basis {
        LookbackBasis::Rows => {
            let closes = series.closes();
            if closes.is_empty() {
                return Err(PerformanceError::EmptySeries {
                    symbol: series.symbol.clone(),
                });
            }
            row_offset_change(&closes, window)
        }
        LookbackBasis::Calendar => calendar_change(series, window),
    }
}

/// Evaluate all four windows for a series.
///
/// Errors only when the series is empty, or when `strict_history` is set
/// and some window lacks history.
pub fn evaluate(
    series: &PriceSeries,
    settings: &PerformanceSettings,
) -> Result<Evaluation, PerformanceError> {
    if series.is_empty() {
        return Err(PerformanceError::EmptySeries {
            symbol: series.symbol.clone(),
        });
    }

    let mut values: MetricValues = [None; 4];
    let mut missing = Vec::new();

    for window in Window::ALL {
        match window_change(series, window, settings.basis) {
            Ok(v) => values[window.index()] = Some(v),
            Err(e) if settings.strict_history && e.is_insufficient_history() => return Err(e),
            Err(e) => missing.push((window, e)),
        }
    }

    Ok(Evaluation {
        values,
        missing,
        observations: series.len(),
    })
}
