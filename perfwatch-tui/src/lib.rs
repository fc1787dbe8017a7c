//! perfwatch TUI: terminal dashboard over an aggregated performance table.
//!
//! Two views:
//! - Main chart: diverging bars of all four windows per investment
//! - Top table: the best investments for the selected window

pub mod app;
pub mod input;
pub mod source;
pub mod theme;
pub mod ui;

pub use app::{AppState, Mode};
pub use theme::Theme;
