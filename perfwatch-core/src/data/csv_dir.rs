//! Offline provider backed by a directory of per-symbol CSV files.
//!
//! Expects `<dir>/<SYMBOL>.csv` with a `Date` column (YYYY-MM-DD) and an
//! `Adj Close` column, falling back to `Close`. This is the layout Yahoo's
//! own CSV download produces.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::provider::{check_range, FetchError, MarketDataProvider};
use crate::domain::{DataSource, PricePoint, PriceSeries};

pub struct CsvDirProvider {
    dir: PathBuf,
}

impl CsvDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    fn read_points(path: &Path) -> Result<Vec<PricePoint>, FetchError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| FetchError::Other(format!("{}: {e}", path.display())))?;

        let headers = rdr
            .headers()
            .map_err(|e| FetchError::ResponseFormatChanged(e.to_string()))?
            .clone();
        let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let date_idx = col("Date")
            .ok_or_else(|| FetchError::ResponseFormatChanged("missing 'Date' column".into()))?;
        let price_idx = col("Adj Close").or_else(|| col("Close")).ok_or_else(|| {
            FetchError::ResponseFormatChanged("missing 'Adj Close' or 'Close' column".into())
        })?;

        let mut points = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| FetchError::ResponseFormatChanged(e.to_string()))?;
            let (Some(date_str), Some(price_str)) = (record.get(date_idx), record.get(price_idx))
            else {
                continue;
            };
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                FetchError::ResponseFormatChanged(format!("bad date '{date_str}': {e}"))
            })?;
            // Yahoo writes "null" for missing closes
            match price_str.parse::<f64>() {
                Ok(v) if v.is_finite() => points.push(PricePoint { date, adj_close: v }),
                _ => continue,
            }
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

impl MarketDataProvider for CsvDirProvider {
    fn name(&self) -> &str {
        "csv_dir"
    }

    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        check_range(start, end)?;
        let path = self.symbol_path(symbol);
        if !path.is_file() {
            return Err(FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let points: Vec<PricePoint> = Self::read_points(&path)?
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();

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
            source: DataSource::CsvImport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn write(dir: &Path, symbol: &str, body: &str) {
        std::fs::write(dir.join(format!("{symbol}.csv")), body).unwrap();
    }

    #[test]
    fn reads_and_filters_range() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "SPY",
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-04,1,1,1,470.0,468.0,10\n\
             2024-01-02,1,1,1,472.0,470.5,10\n\
             2024-01-03,1,1,1,null,null,10\n\
             2024-01-05,1,1,1,471.0,469.0,10\n",
        );
        let provider = CsvDirProvider::new(tmp.path());
        let series = provider.fetch_series("SPY", d(2024, 1, 1), d(2024, 1, 4)).unwrap();
        assert_eq!(series.source, DataSource::CsvImport);
        assert_eq!(series.closes(), vec![470.5, 468.0]);
        assert_eq!(series.points[0].date, d(2024, 1, 2));
    }

    #[test]
    fn null_closes_are_dropped_not_padded() {
        use crate::performance::{evaluate, PerformanceSettings};

        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "GLD",
            "Date,Adj Close\n\
             2024-01-02,100.0\n\
             2024-01-03,105.0\n\
             2024-01-04,null\n\
             2024-01-05,110.0\n\
             2024-01-08,120.0\n",
        );
        let provider = CsvDirProvider::new(tmp.path());
        let series = provider.fetch_series("GLD", d(2024, 1, 1), d(2024, 1, 31)).unwrap();
        assert_eq!(series.closes(), vec![100.0, 105.0, 110.0, 120.0]);

        // 3 rows back from 120 is 100, not the padded 105
        let evaluation = evaluate(&series, &PerformanceSettings::default()).unwrap();
        let three = evaluation.values[1].unwrap();
        assert!((three - 20.0).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_close_column() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "QQQ", "Date,Close\n2024-01-02,400.0\n");
        let provider = CsvDirProvider::new(tmp.path());
        let series = provider.fetch_series("QQQ", d(2024, 1, 1), d(2024, 12, 31)).unwrap();
        assert_eq!(series.closes(), vec![400.0]);
    }

    #[test]
    fn missing_file_is_symbol_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = CsvDirProvider::new(tmp.path());
        let err = provider
            .fetch_series("NOPE", d(2024, 1, 1), d(2024, 2, 1))
            .unwrap_err();
        assert!(matches!(err, FetchError::SymbolNotFound { .. }));
    }

    #[test]
    fn out_of_range_is_empty_series() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "IWM", "Date,Adj Close\n2020-01-02,150.0\n");
        let provider = CsvDirProvider::new(tmp.path());
        let err = provider
            .fetch_series("IWM", d(2024, 1, 1), d(2024, 2, 1))
            .unwrap_err();
        assert!(matches!(err, FetchError::EmptySeries { .. }));
    }
}
