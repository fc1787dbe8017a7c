//! Market-data provider trait and structured fetch errors.
//!
//! The MarketDataProvider trait abstracts over data sources (Yahoo Finance,
//! CSV directory, synthetic) so the aggregator can be driven by a fake in tests.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::PriceSeries;

/// Structured error types for a single fetch.
///
/// These are displayable in both CLI and TUI contexts and end up in the
/// diagnostic log verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no price data for {symbol} between {start} and {end}")]
    EmptySeries {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for market-data providers.
///
/// One blocking call per symbol. Implementations never retry; a failed
/// fetch is reported once and the caller moves on.
pub trait MarketDataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the adjusted-close series for a symbol over an inclusive date range.
    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        (**self).fetch_series(symbol, start, end)
    }
}

/// Check a range before hitting a provider.
pub(crate) fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), FetchError> {
    if start > end {
        return Err(FetchError::InvalidRange { start, end });
    }
    Ok(())
}
