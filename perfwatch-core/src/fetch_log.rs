//! Diagnostic log capability for the aggregator.
//!
//! The aggregator reports every fetch attempt and its outcome through the
//! [`FetchLog`] trait. The binaries inject [`TracingFetchLog`], which turns
//! the events into `tracing` records; tests inject [`MemoryFetchLog`] and
//! inspect what was recorded.

use std::sync::Mutex;

use crate::domain::{CatalogEntry, Window};
use crate::performance::PerformanceError;

/// How a single entry ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// All four metrics computed.
    Complete { observations: usize },
    /// Series fetched, but some windows could not be computed.
    Partial {
        observations: usize,
        missing: Vec<(Window, PerformanceError)>,
    },
    /// Nothing computed; the row is emitted with all metrics empty.
    Failed(PerformanceError),
}

impl FetchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// Progress/diagnostic callback for an aggregation run.
pub trait FetchLog {
    /// Called before the provider is asked for an entry's series.
    fn on_start(&self, entry: &CatalogEntry, index: usize, total: usize);

    /// Called once per entry with its outcome.
    fn on_complete(&self, entry: &CatalogEntry, index: usize, total: usize, outcome: &FetchOutcome);

    /// Called when every entry has been processed.
    fn on_batch_complete(&self, succeeded: usize, partial: usize, failed: usize, total: usize);
}

/// Emits one `tracing` event per start and per outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFetchLog;

impl FetchLog for TracingFetchLog {
    fn on_start(&self, entry: &CatalogEntry, index: usize, total: usize) {
        tracing::info!(
            "[{}/{}] Fetching data for {} ({})...",
            index + 1,
            total,
            entry.name,
            entry.symbol
        );
    }

    fn on_complete(
        &self,
        entry: &CatalogEntry,
        _index: usize,
        _total: usize,
        outcome: &FetchOutcome,
    ) {
        match outcome {
            FetchOutcome::Complete { observations } => tracing::info!(
                "Data fetched successfully for {} ({}): {observations} observations",
                entry.name,
                entry.symbol
            ),
            FetchOutcome::Partial {
                observations,
                missing,
            } => {
                let reasons: Vec<String> = missing.iter().map(|(_, e)| e.to_string()).collect();
                tracing::warn!(
                    "Data fetched for {} ({}) with gaps ({observations} observations): {}",
                    entry.name,
                    entry.symbol,
                    reasons.join("; ")
                );
            }
            FetchOutcome::Failed(e) => tracing::error!(
                "Unable to fetch data for {} ({}). Error: {e}",
                entry.name,
                entry.symbol
            ),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, partial: usize, failed: usize, total: usize) {
        tracing::info!(
            "Aggregation complete: {succeeded}/{total} complete, {partial} partial, {failed} failed"
        );
    }
}

/// Simple progress reporter that prints to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutFetchLog;

impl FetchLog for StdoutFetchLog {
    fn on_start(&self, entry: &CatalogEntry, index: usize, total: usize) {
        println!("[{}/{}] Fetching {} ({})...", index + 1, total, entry.name, entry.symbol);
    }

    fn on_complete(
        &self,
        entry: &CatalogEntry,
        _index: usize,
        _total: usize,
        outcome: &FetchOutcome,
    ) {
        match outcome {
            FetchOutcome::Complete { .. } => println!("  OK: {}", entry.symbol),
            FetchOutcome::Partial { missing, .. } => {
                let windows: Vec<&str> = missing.iter().map(|(w, _)| w.key()).collect();
                println!("  PARTIAL: {} (missing {})", entry.symbol, windows.join(", "));
            }
            FetchOutcome::Failed(e) => println!("  FAIL: {}: {e}", entry.symbol),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, partial: usize, failed: usize, total: usize) {
        println!(
            "\nFetch complete: {succeeded}/{total} complete, {partial} partial, {failed} failed"
        );
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    Started {
        symbol: String,
        index: usize,
        total: usize,
    },
    Completed {
        symbol: String,
        outcome: FetchOutcome,
    },
    BatchComplete {
        succeeded: usize,
        partial: usize,
        failed: usize,
        total: usize,
    },
}

/// In-memory recorder, for tests and for callers that want to inspect outcomes.
#[derive(Debug, Default)]
pub struct MemoryFetchLog {
    events: Mutex<Vec<FetchEvent>>,
}

impl MemoryFetchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FetchEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Outcomes in the order they were reported.
    pub fn outcomes(&self) -> Vec<(String, FetchOutcome)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FetchEvent::Completed { symbol, outcome } => Some((symbol, outcome)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: FetchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl FetchLog for MemoryFetchLog {
    fn on_start(&self, entry: &CatalogEntry, index: usize, total: usize) {
        self.push(FetchEvent::Started {
            symbol: entry.symbol.clone(),
            index,
            total,
        });
    }

    fn on_complete(
        &self,
        entry: &CatalogEntry,
        _index: usize,
        _total: usize,
        outcome: &FetchOutcome,
    ) {
        self.push(FetchEvent::Completed {
            symbol: entry.symbol.clone(),
            outcome: outcome.clone(),
        });
    }

    fn on_batch_complete(&self, succeeded: usize, partial: usize, failed: usize, total: usize) {
        self.push(FetchEvent::BatchComplete {
            succeeded,
            partial,
            failed,
            total,
        });
    }
}

/// Forwards every event to two logs, e.g. tracing plus an in-memory recorder.
pub struct TeeFetchLog<'a> {
    first: &'a dyn FetchLog,
    second: &'a dyn FetchLog,
}

impl<'a> TeeFetchLog<'a> {
    pub fn new(first: &'a dyn FetchLog, second: &'a dyn FetchLog) -> Self {
        Self { first, second }
    }
}

impl FetchLog for TeeFetchLog<'_> {
    fn on_start(&self, entry: &CatalogEntry, index: usize, total: usize) {
        self.first.on_start(entry, index, total);
        self.second.on_start(entry, index, total);
    }

    fn on_complete(
        &self,
        entry: &CatalogEntry,
        index: usize,
        total: usize,
        outcome: &FetchOutcome,
    ) {
        self.first.on_complete(entry, index, total, outcome);
        self.second.on_complete(entry, index, total, outcome);
    }

    fn on_batch_complete(&self, succeeded: usize, partial: usize, failed: usize, total: usize) {
        self.first.on_batch_complete(succeeded, partial, failed, total);
        self.second.on_batch_complete(succeeded, partial, failed, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FetchError;

    #[test]
    fn memory_log_records_in_order() {
        let log = MemoryFetchLog::new();
        let entry = CatalogEntry::new("Apple", "AAPL");
        log.on_start(&entry, 0, 1);
        log.on_complete(&entry, 0, 1, &FetchOutcome::Complete { observations: 10 });
        log.on_batch_complete(1, 0, 0, 1);

        let events = log.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], FetchEvent::Started { index: 0, .. }));
        assert_eq!(
            log.outcomes(),
            vec![("AAPL".to_string(), FetchOutcome::Complete { observations: 10 })]
        );
    }

    #[test]
    fn tee_forwards_to_both() {
        let a = MemoryFetchLog::new();
        let b = MemoryFetchLog::new();
        let tee = TeeFetchLog::new(&a, &b);
        let entry = CatalogEntry::new("BadCo", "ZZZZ9");
        let outcome = FetchOutcome::Failed(
            FetchError::SymbolNotFound {
                symbol: "ZZZZ9".into(),
            }
            .into(),
        );
        tee.on_complete(&entry, 0, 1, &outcome);
        assert_eq!(a.events(), b.events());
        assert!(a.outcomes()[0].1.is_failure());
    }
}
