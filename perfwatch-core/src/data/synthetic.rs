//! Synthetic data provider for demos and offline development.
//!
//! Produces a weekday random walk from a starting price of 100.0. The walk is
//! seeded from the symbol name, so the same symbol always yields the same
//! series for the same date range.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{check_range, FetchError, MarketDataProvider};
use crate::domain::{DataSource, PricePoint, PriceSeries};

#[derive(Debug, Default)]
pub struct SyntheticProvider {
    fail_symbols: HashSet<String>,
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbols that should report `SymbolNotFound`, for exercising failure paths.
    pub fn with_failing<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fail_symbols.extend(symbols.into_iter().map(Into::into));
        self
    }
}

/// Generate the synthetic walk for one symbol.
pub fn synthetic_points(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
    // Deterministic seed from symbol name
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut points = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        price *= 1.0 + daily_return;
        points.push(PricePoint {
            date: current,
            adj_close: price,
        });

        current += chrono::Duration::days(1);
    }

    points
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        check_range(start, end)?;
        if self.fail_symbols.contains(symbol) {
            return Err(FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let points = synthetic_points(symbol, start, end);
        if points.is_empty() {
            return Err(FetchError::EmptySeries {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        Ok(PriceSeries {
            symbol: symbol.to_string(),
            points,
            source: DataSource::Synthetic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_symbol_same_series() {
        let a = synthetic_points("SPY", d(2024, 1, 1), d(2024, 3, 1));
        let b = synthetic_points("SPY", d(2024, 1, 1), d(2024, 3, 1));
        assert_eq!(a, b);
        let c = synthetic_points("QQQ", d(2024, 1, 1), d(2024, 3, 1));
        assert_ne!(a, c);
    }

    #[test]
    fn skips_weekends() {
        let points = synthetic_points("SPY", d(2024, 1, 1), d(2024, 1, 14));
        assert_eq!(points.len(), 10);
        assert!(points
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn a_year_has_enough_rows_for_every_window() {
        let points = synthetic_points("SPY", d(2023, 1, 1), d(2024, 1, 31));
        assert!(points.len() > 252);
    }

    #[test]
    fn failing_symbols_report_not_found() {
        let provider = SyntheticProvider::new().with_failing(["ZZZZ9"]);
        assert!(provider.fetch_series("SPY", d(2024, 1, 1), d(2024, 2, 1)).is_ok());
        let err = provider
            .fetch_series("ZZZZ9", d(2024, 1, 1), d(2024, 2, 1))
            .unwrap_err();
        assert!(matches!(err, FetchError::SymbolNotFound { .. }));
    }

    #[test]
    fn weekend_only_range_is_empty() {
        let provider = SyntheticProvider::new();
        let err = provider
            .fetch_series("SPY", d(2024, 1, 6), d(2024, 1, 7))
            .unwrap_err();
        assert!(matches!(err, FetchError::EmptySeries { .. }));
    }
}
