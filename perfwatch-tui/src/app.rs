//! Application state: single-owner, main-thread only.
//!
//! The table is loaded before the terminal is entered and never changes
//! afterwards; the state here is only what the user is looking at.

use std::collections::HashMap;

use perfwatch_core::domain::{PerformanceRow, Window};
use perfwatch_report::ranking::{top_n, value_range};

/// Which view is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    MainChart,
    TopTable,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::MainChart => "Main Chart",
            Mode::TopTable => "Top Table",
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug)]
pub struct AppState {
    pub rows: Vec<PerformanceRow>,
    /// Where the rows came from, shown in the title.
    pub source: String,
    pub mode: Mode,
    pub window: Window,
    pub top_n: usize,
    /// First visible row in the main chart.
    pub scroll: usize,
    pub show_help: bool,
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
    /// Why a symbol has no data, when the rows came from a live run.
    pub failure_reasons: HashMap<String, String>,
}

impl AppState {
    pub fn new(rows: Vec<PerformanceRow>, source: impl Into<String>, top_n: usize) -> Self {
        let mut app = Self {
            rows,
            source: source.into(),
            mode: Mode::MainChart,
            window: Window::OneMonth,
            top_n,
            scroll: 0,
            show_help: false,
            running: true,
            status_message: None,
            failure_reasons: HashMap::new(),
        };

        let failed = app.failed_count();
        if app.rows.is_empty() {
            app.set_warning("No investments loaded");
        } else if failed == app.rows.len() {
            app.set_error(format!("No data for any of {} investments", failed));
        } else if failed > 0 {
            app.set_warning(format!(
                "{} investments loaded, {failed} without data",
                app.rows.len()
            ));
        } else {
            app.set_status(format!("{} investments loaded", app.rows.len()));
        }
        app
    }

    /// Attach per-symbol failure reasons and name the first one in the status bar.
    pub fn with_failure_reasons<I>(mut self, reasons: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let reasons: Vec<(String, String)> = reasons.into_iter().collect();
        if let Some((symbol, reason)) = reasons.first() {
            let first = format!("{symbol}: {reason}");
            let summary = match &self.status_message {
                Some((msg, _)) => format!("{msg} ({first})"),
                None => first,
            };
            if self.failed_count() == self.rows.len() {
                self.set_error(summary);
            } else {
                self.set_warning(summary);
            }
        }
        self.failure_reasons.extend(reasons);
        self
    }

    pub fn failure_reason(&self, symbol: &str) -> Option<&str> {
        self.failure_reasons.get(symbol).map(String::as_str)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    /// Rows with no metric at all.
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_empty()).count()
    }

    /// Top rows for the selected window.
    pub fn leaders(&self) -> Vec<&PerformanceRow> {
        top_n(&self.rows, self.window, self.top_n)
    }

    /// Largest absolute value across every window, for a shared bar scale.
    pub fn max_abs(&self) -> f64 {
        let (min, max) = value_range(&self.rows, &Window::ALL);
        min.abs().max(max.abs())
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn select_window(&mut self, window: Window) {
        self.window = window;
        let shown = self.leaders().len();
        if shown == 0 {
            self.set_warning(format!("No data for {}", window.label()));
        } else {
            self.set_status(window.label());
        }
    }

    pub fn scroll_down(&mut self) {
        if self.scroll + 1 < self.rows.len() {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_top(&mut self) {
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfwatch_core::domain::CatalogEntry;

    fn rows() -> Vec<PerformanceRow> {
        vec![
            PerformanceRow::new(
                &CatalogEntry::new("Apple", "AAPL"),
                [Some(2.0), Some(-12.5), Some(8.0), Some(30.0)],
            ),
            PerformanceRow::failed(&CatalogEntry::new("BadCo", "ZZZZ9")),
            PerformanceRow::new(
                &CatalogEntry::new("Young", "YNG"),
                [Some(4.0), Some(1.0), Some(2.0), None],
            ),
        ]
    }

    #[test]
    fn new_reports_failures_as_warning() {
        let app = AppState::new(rows(), "test", 5);
        assert_eq!(app.mode, Mode::MainChart);
        assert_eq!(app.window, Window::OneMonth);
        assert_eq!(app.failed_count(), 1);
        let (msg, level) = app.status_message.clone().unwrap();
        assert_eq!(level, StatusLevel::Warning);
        assert!(msg.contains("1 without data"));
    }

    #[test]
    fn all_failed_is_an_error() {
        let rows = vec![PerformanceRow::failed(&CatalogEntry::new("BadCo", "ZZZZ9"))];
        let app = AppState::new(rows, "test", 5);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Error);
    }

    #[test]
    fn empty_table_is_a_warning() {
        let app = AppState::new(vec![], "test", 5);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
        assert_eq!(app.max_abs(), 1.0);
    }

    #[test]
    fn failure_reasons_reach_the_status_bar() {
        let app = AppState::new(rows(), "test", 5).with_failure_reasons(vec![(
            "ZZZZ9".to_string(),
            "symbol not found: ZZZZ9".to_string(),
        )]);
        assert_eq!(app.failure_reason("ZZZZ9"), Some("symbol not found: ZZZZ9"));
        assert_eq!(app.failure_reason("AAPL"), None);
        let (msg, level) = app.status_message.as_ref().unwrap();
        assert_eq!(*level, StatusLevel::Warning);
        assert!(msg.contains("1 without data"));
        assert!(msg.contains("ZZZZ9: symbol not found"));
    }

    #[test]
    fn no_reasons_keeps_status() {
        let app = AppState::new(rows(), "test", 5).with_failure_reasons(Vec::new());
        assert!(app.failure_reasons.is_empty());
        assert!(app.status_message.as_ref().unwrap().0.ends_with("without data"));
    }

    #[test]
    fn leaders_follow_selected_window() {
        let mut app = AppState::new(rows(), "test", 5);
        let syms: Vec<&str> = app.leaders().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(syms, vec!["YNG", "AAPL"]);

        app.select_window(Window::OneYear);
        let syms: Vec<&str> = app.leaders().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(syms, vec!["AAPL"]);
    }

    #[test]
    fn max_abs_spans_all_windows() {
        let app = AppState::new(rows(), "test", 5);
        assert_eq!(app.max_abs(), 30.0);
    }

    #[test]
    fn scroll_is_bounded() {
        let mut app = AppState::new(rows(), "test", 5);
        app.scroll_up();
        assert_eq!(app.scroll, 0);
        for _ in 0..10 {
            app.scroll_down();
        }
        assert_eq!(app.scroll, 2);
        app.scroll_top();
        assert_eq!(app.scroll, 0);
    }
}
