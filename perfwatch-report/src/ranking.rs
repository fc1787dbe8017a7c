//! Top-N ranking by one performance window.

use perfwatch_core::domain::{PerformanceRow, Window};

pub const DEFAULT_TOP_N: usize = 5;

/// Rows with a value for `window`, best first, at most `n` of them.
///
/// Rows without a value are left out. Ties keep catalog order.
pub fn top_n(rows: &[PerformanceRow], window: Window, n: usize) -> Vec<&PerformanceRow> {
    let mut ranked: Vec<(&PerformanceRow, f64)> = rows
        .iter()
        .filter_map(|r| r.get(window).map(|v| (r, v)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(n).map(|(r, _)| r).collect()
}

/// Smallest and largest value across the given windows, always spanning zero.
///
/// Returns `(-1.0, 1.0)` when there is nothing to plot.
pub fn value_range(rows: &[PerformanceRow], windows: &[Window]) -> (f64, f64) {
    let values = rows
        .iter()
        .flat_map(|r| windows.iter().filter_map(move |&w| r.get(w)));

    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min == 0.0 && max == 0.0 {
        (-1.0, 1.0)
    } else {
        (min, max)
    }
}
