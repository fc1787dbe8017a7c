//! Market-data providers

pub mod csv_dir;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_dir::CsvDirProvider;
pub use provider::{FetchError, MarketDataProvider};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
