//! Main chart: diverging horizontal bars, four windows per investment.
//!
//! Negative values grow left of the zero axis, positive values right of it.
//! All bars share one scale so windows and investments compare directly.

use perfwatch_core::domain::{PerformanceRow, Window};
use perfwatch_report::svg::format_pct;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::truncate;

const LABEL_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 10;
const BAR_CHAR: char = '█';
const AXIS_CHAR: char = '│';

/// Left and right halves of a diverging bar, each exactly `half` chars wide.
///
/// A non-zero value always gets at least one cell.
pub fn diverging_bar(value: f64, max_abs: f64, half: usize) -> (String, String) {
    let cells = if half > 0 && max_abs > 0.0 && value.is_finite() {
        let scaled = (value.abs() / max_abs * half as f64).round() as usize;
        if value != 0.0 {
            scaled.clamp(1, half)
        } else {
            0
        }
    } else {
        0
    };

    let filled: String = std::iter::repeat(BAR_CHAR).take(cells).collect();
    let blank: String = " ".repeat(half - cells);
    if value < 0.0 {
        (format!("{blank}{filled}"), " ".repeat(half))
    } else {
        (" ".repeat(half), format!("{filled}{blank}"))
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    if app.rows.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("No investments to chart.", theme::muted())),
        ];
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let width = area.width as usize;
    let half = width.saturating_sub(LABEL_WIDTH + VALUE_WIDTH + 4) / 2;
    let max_abs = app.max_abs();
    let height = area.height as usize;

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled(" ".repeat(LABEL_WIDTH), theme::muted()),
        Span::styled(
            format!("{:<half$}", format!("-{max_abs:.1}%")),
            theme::muted(),
        ),
        Span::styled("0", theme::muted()),
        Span::styled(format!("{:>half$}", format!("+{max_abs:.1}%")), theme::muted()),
    ])];

    for row in app.rows.iter().skip(app.scroll) {
        let reason = app.failure_reason(&row.symbol);
        let block = row_lines(row, reason, max_abs, half, width);
        if lines.len() + block.len() > height {
            break;
        }
        lines.extend(block);
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn row_lines(
    row: &PerformanceRow,
    reason: Option<&str>,
    max_abs: f64,
    half: usize,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(row.symbol.clone(), theme::accent_bold()),
        Span::styled(format!("  {}", truncate(&row.name, 40)), theme::secondary()),
    ])];

    if row.is_empty() {
        let text = match reason {
            Some(reason) => truncate(&format!("  no data: {reason}"), width),
            None => "  no data".to_string(),
        };
        lines.push(Line::from(Span::styled(text, theme::warning())));
        lines.push(Line::from(""));
        return lines;
    }

    for window in Window::ALL {
        let value = row.get(window);
        let label = Span::styled(
            format!("  {:<w$}", window.short_label(), w = LABEL_WIDTH - 2),
            theme::muted(),
        );
        let (left, right) = match value {
            Some(v) => diverging_bar(v, max_abs, half),
            None => (" ".repeat(half), " ".repeat(half)),
        };
        lines.push(Line::from(vec![
            label,
            Span::styled(left, theme::series(window)),
            Span::styled(AXIS_CHAR.to_string(), theme::muted()),
            Span::styled(right, theme::series(window)),
            Span::styled(
                format!(" {:>w$}", format_pct(value), w = VALUE_WIDTH),
                theme::metric(value),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_fills_right_from_axis() {
        let (left, right) = diverging_bar(5.0, 10.0, 10);
        assert_eq!(left, " ".repeat(10));
        assert_eq!(right, format!("{}{}", "█".repeat(5), " ".repeat(5)));
    }

    #[test]
    fn negative_fills_left_toward_axis() {
        let (left, right) = diverging_bar(-10.0, 10.0, 4);
        assert_eq!(left, "████");
        assert_eq!(right, "    ");
    }

    #[test]
    fn tiny_values_stay_visible() {
        let (_, right) = diverging_bar(0.001, 100.0, 10);
        assert!(right.starts_with('█'));
        let (left, right) = diverging_bar(0.0, 100.0, 10);
        assert!(!left.contains('█') && !right.contains('█'));
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn failed_row_shows_reason() {
        use perfwatch_core::domain::CatalogEntry;
        let row = PerformanceRow::failed(&CatalogEntry::new("BadCo", "ZZZZ9"));

        let lines = row_lines(&row, Some("symbol not found: ZZZZ9"), 10.0, 10, 80);
        assert_eq!(line_text(&lines[1]), "  no data: symbol not found: ZZZZ9");

        let lines = row_lines(&row, None, 10.0, 10, 80);
        assert_eq!(line_text(&lines[1]), "  no data");
    }

    proptest! {
        #[test]
        fn halves_have_fixed_width(value in -500.0..500.0_f64, half in 0usize..60) {
            let max_abs = 500.0;
            let (left, right) = diverging_bar(value, max_abs, half);
            prop_assert_eq!(left.chars().count(), half);
            prop_assert_eq!(right.chars().count(), half);
            // only one side carries the bar
            prop_assert!(!(left.contains(BAR_CHAR) && right.contains(BAR_CHAR)));
        }
    }
}
