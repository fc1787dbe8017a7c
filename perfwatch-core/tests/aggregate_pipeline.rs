//! Integration tests for the aggregation pipeline.
//!
//! A deterministic in-memory provider stands in for the network, so these
//! tests pin down row count/order, failure isolation and the row-offset
//! formula without touching Yahoo.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use perfwatch_core::config::DateWindow;
use perfwatch_core::domain::DataSource;
use perfwatch_core::fetch_log::{FetchEvent, FetchOutcome, MemoryFetchLog};
use perfwatch_core::{
    aggregate, read_catalog, AggregateOptions, CatalogEntry, FetchError, LookbackBasis,
    MarketDataProvider, PerformanceError, PerformanceSettings, PricePoint, PriceSeries, Window,
};
use proptest::prelude::*;

/// Provider serving canned closes per symbol and failing everything else.
#[derive(Default)]
struct FakeProvider {
    closes: HashMap<String, Vec<f64>>,
    calls: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl FakeProvider {
    fn with(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.closes.insert(symbol.to_string(), closes);
        self
    }
}

impl MarketDataProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, FetchError> {
        self.calls
            .borrow_mut()
            .push((symbol.to_string(), start, end));
        let closes = self
            .closes
            .get(symbol)
            .ok_or_else(|| FetchError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        Ok(PriceSeries {
            symbol: symbol.to_string(),
            points: closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint {
                    date: start + chrono::Duration::days(i as i64),
                    adj_close: c,
                })
                .collect(),
            source: DataSource::Synthetic,
        })
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn ramp(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
}

fn expected(closes: &[f64], k: usize) -> f64 {
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - 1 - k];
    (last - base) / base * 100.0
}

#[test]
fn apple_and_badco_scenario() {
    let csv = "Investment Name,Symbol\nApple,AAPL\nBadCo,ZZZZ9\n";
    let catalog = read_catalog(csv.as_bytes()).unwrap();
    let closes = ramp(260);
    let provider = FakeProvider::default().with("AAPL", closes.clone());
    let log = MemoryFetchLog::new();

    let table = aggregate(&catalog, &provider, &log, &AggregateOptions::default(), today());

    assert_eq!(table.len(), 2);

    let apple = &table.rows[0];
    assert_eq!(apple.name, "Apple");
    assert_eq!(apple.symbol, "AAPL");
    for window in Window::ALL {
        let got = apple.get(window).expect("metric present");
        assert!((got - expected(&closes, window.row_offset())).abs() < 1e-9);
    }

    let bad = &table.rows[1];
    assert_eq!(bad.name, "BadCo");
    assert_eq!(bad.symbol, "ZZZZ9");
    assert!(bad.is_empty());

    let outcomes = log.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        outcomes[0],
        ("AAPL".to_string(), FetchOutcome::Complete { observations: 260 })
    );
    assert_eq!(
        outcomes[1],
        (
            "ZZZZ9".to_string(),
            FetchOutcome::Failed(PerformanceError::Fetch(FetchError::SymbolNotFound {
                symbol: "ZZZZ9".into()
            }))
        )
    );

    let starts = log
        .events()
        .into_iter()
        .filter(|e| matches!(e, FetchEvent::Started { .. }))
        .count();
    assert_eq!(starts, 2);
    assert_eq!(
        log.events().last(),
        Some(&FetchEvent::BatchComplete {
            succeeded: 1,
            partial: 0,
            failed: 1,
            total: 2
        })
    );
}

#[test]
fn short_series_nulls_only_one_year() {
    let entries = vec![CatalogEntry::new("Young Fund", "YNG")];
    let provider = FakeProvider::default().with("YNG", ramp(100));
    let log = MemoryFetchLog::new();

    let table = aggregate(&entries, &provider, &log, &AggregateOptions::default(), today());
    let row = &table.rows[0];
    assert!(row.perf_1m.is_some());
    assert!(row.perf_3m.is_some());
    assert!(row.perf_6m.is_some());
    assert!(row.perf_1y.is_none());

    match &log.outcomes()[0].1 {
        FetchOutcome::Partial { missing, .. } => {
            assert_eq!(missing.len(), 1);
            assert_eq!(missing[0].0, Window::OneYear);
        }
        other => panic!("expected partial outcome, got {other:?}"),
    }
}

#[test]
fn strict_history_turns_short_series_into_failure() {
    let entries = vec![CatalogEntry::new("Young Fund", "YNG")];
    let provider = FakeProvider::default().with("YNG", ramp(100));
    let log = MemoryFetchLog::new();
    let options = AggregateOptions {
        performance: PerformanceSettings {
            basis: LookbackBasis::Rows,
            strict_history: true,
        },
        ..Default::default()
    };

    let table = aggregate(&entries, &provider, &log, &options, today());
    assert!(table.rows[0].is_empty());
    assert!(log.outcomes()[0].1.is_failure());
}

#[test]
fn empty_series_is_a_failed_row() {
    let entries = vec![CatalogEntry::new("Ghost", "GHST")];
    let provider = FakeProvider::default().with("GHST", vec![]);
    let log = MemoryFetchLog::new();

    let table = aggregate(&entries, &provider, &log, &AggregateOptions::default(), today());
    assert!(table.rows[0].is_empty());
    assert!(matches!(
        log.outcomes()[0].1,
        FetchOutcome::Failed(PerformanceError::EmptySeries { .. })
    ));
}

#[test]
fn provider_is_asked_for_the_configured_window() {
    let entries = vec![CatalogEntry::new("Apple", "AAPL")];
    let provider = FakeProvider::default().with("AAPL", ramp(10));
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let options = AggregateOptions {
        window: DateWindow::Fixed { start, end },
        ..Default::default()
    };

    aggregate(&entries, &provider, &MemoryFetchLog::new(), &options, today());
    assert_eq!(
        provider.calls.borrow().as_slice(),
        &[("AAPL".to_string(), start, end)]
    );

    let provider = FakeProvider::default().with("AAPL", ramp(10));
    aggregate(
        &entries,
        &provider,
        &MemoryFetchLog::new(),
        &AggregateOptions::default(),
        today(),
    );
    let (_, s, e) = provider.calls.borrow()[0].clone();
    assert_eq!(e, today());
    assert_eq!((e - s).num_days(), 400);
}

#[test]
fn duplicate_symbols_each_get_a_row() {
    let entries = vec![
        CatalogEntry::new("Apple", "AAPL"),
        CatalogEntry::new("Apple (again)", "AAPL"),
    ];
    let provider = FakeProvider::default().with("AAPL", ramp(300));
    let table = aggregate(
        &entries,
        &provider,
        &MemoryFetchLog::new(),
        &AggregateOptions::default(),
        today(),
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows[0].values(), table.rows[1].values());
    assert_eq!(table.rows[1].name, "Apple (again)");
}

// ── Property tests ───────────────────────────────────────────────────

fn arb_entries() -> impl Strategy<Value = Vec<(String, bool, usize)>> {
    // (symbol suffix, provider knows it, series length)
    prop::collection::vec(("[A-Z]{1,4}", any::<bool>(), 0usize..300), 0..20)
}

proptest! {
    /// N entries in, N rows out, same order, failures isolated to their own row.
    #[test]
    fn row_count_and_order_are_preserved(layout in arb_entries()) {
        let mut provider = FakeProvider::default();
        let mut entries = Vec::new();
        for (i, (sym, known, len)) in layout.iter().enumerate() {
            let symbol = format!("{sym}{i}");
            if *known {
                provider = provider.with(&symbol, ramp(*len));
            }
            entries.push(CatalogEntry::new(format!("Fund {i}"), symbol));
        }

        let log = MemoryFetchLog::new();
        let table = aggregate(&entries, &provider, &log, &AggregateOptions::default(), today());

        prop_assert_eq!(table.len(), entries.len());
        for (row, entry) in table.rows.iter().zip(&entries) {
            prop_assert_eq!(&row.name, &entry.name);
            prop_assert_eq!(&row.symbol, &entry.symbol);
        }
        for (row, (_, known, len)) in table.rows.iter().zip(&layout) {
            if !*known || *len == 0 {
                prop_assert!(row.is_empty());
            } else {
                prop_assert_eq!(row.perf_1m.is_some(), *len > 1);
                prop_assert_eq!(row.perf_1y.is_some(), *len > 252);
            }
        }
        prop_assert_eq!(log.outcomes().len(), entries.len());
    }

    /// Every metric equals the row-offset formula on the last observation.
    #[test]
    fn metrics_match_row_offset_formula(
        closes in prop::collection::vec(1.0..1000.0_f64, 253..320)
    ) {
        let entries = vec![CatalogEntry::new("Any", "ANY")];
        let provider = FakeProvider::default().with("ANY", closes.clone());
        let table = aggregate(
            &entries,
            &provider,
            &MemoryFetchLog::new(),
            &AggregateOptions::default(),
            today(),
        );
        for window in Window::ALL {
            let got = table.rows[0].get(window).unwrap();
            let want = expected(&closes, window.row_offset());
            prop_assert!((got - want).abs() <= 1e-9 * want.abs().max(1.0));
        }
    }
}
