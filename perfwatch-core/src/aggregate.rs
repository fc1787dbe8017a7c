//! Performance aggregator: one row per catalog entry, in catalog order.
//!
//! Entries are processed sequentially. A failure for one entry (fetch error,
//! empty series, strict-history violation) produces a row with every metric
//! empty and never stops the run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, DateWindow};
use crate::data::MarketDataProvider;
use crate::domain::{CatalogEntry, PerformanceRow, PerformanceTable};
use crate::fetch_log::{FetchLog, FetchOutcome};
use crate::performance::{evaluate, PerformanceError, PerformanceSettings};

/// Parameters of an aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    pub window: DateWindow,
    pub performance: PerformanceSettings,
}

impl From<&AppConfig> for AggregateOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            window: config.window,
            performance: config.performance,
        }
    }
}

/// Aggregate every entry into a performance table.
pub fn aggregate(
    entries: &[CatalogEntry],
    provider: &dyn MarketDataProvider,
    log: &dyn FetchLog,
    options: &AggregateOptions,
    today: NaiveDate,
) -> PerformanceTable {
    let total = entries.len();
    let (start, end) = options.window.resolve(today);
    let mut rows = Vec::with_capacity(total);
    let mut succeeded = 0;
    let mut partial = 0;
    let mut failed = 0;

    for (i, entry) in entries.iter().enumerate() {
        log.on_start(entry, i, total);

        let fetched = aggregate_single(entry, provider, &options.performance, start, end);
        let (row, outcome) = match fetched {
            Ok(evaluation) => {
                let row = PerformanceRow::new(entry, evaluation.values);
                let outcome = if evaluation.is_complete() {
                    succeeded += 1;
                    FetchOutcome::Complete {
                        observations: evaluation.observations,
                    }
                } else {
                    partial += 1;
                    FetchOutcome::Partial {
                        observations: evaluation.observations,
                        missing: evaluation.missing,
                    }
                };
                (row, outcome)
            }
            Err(e) => {
                failed += 1;
                (PerformanceRow::failed(entry), FetchOutcome::Failed(e))
            }
        };

        log.on_complete(entry, i, total, &outcome);
        rows.push(row);
    }

    log.on_batch_complete(succeeded, partial, failed, total);

    PerformanceTable::new(rows)
}

/// Aggregate a single entry: fetch → evaluate.
fn aggregate_single(
    entry: &CatalogEntry,
    provider: &dyn MarketDataProvider,
    settings: &PerformanceSettings,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<crate::performance::Evaluation, PerformanceError> {
    let series = provider.fetch_series(&entry.symbol, start, end)?;
    tracing::debug!(
        symbol = %entry.symbol,
        source = series.source.label(),
        observations = series.len(),
        "series fetched"
    );
    evaluate(&series, settings)
}
