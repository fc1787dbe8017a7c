//! perfwatch core: catalog, market data, performance metrics, aggregation.
//!
//! This crate contains the whole pipeline up to the aggregated table:
//! - Domain types (catalog entries, price series, performance rows)
//! - Catalog loading from CSV
//! - Market-data providers behind a single-method trait
//! - Row-offset and calendar percentage-change metrics
//! - Sequential aggregator with per-entry failure isolation
//! - Injected fetch-log capability, configuration, log-file setup

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod data;
pub mod domain;
pub mod fetch_log;
pub mod logging;
pub mod performance;

pub use aggregate::{aggregate, AggregateOptions};
pub use catalog::{load_catalog, read_catalog, CatalogError};
pub use config::{AppConfig, ConfigError, DateWindow, ProviderConfig, Sink};
pub use data::{FetchError, MarketDataProvider};
pub use domain::{CatalogEntry, PerformanceRow, PerformanceTable, PricePoint, PriceSeries, Window};
pub use fetch_log::{FetchLog, FetchOutcome, MemoryFetchLog, TracingFetchLog};
pub use performance::{LookbackBasis, PerformanceError, PerformanceSettings};
