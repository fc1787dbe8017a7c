//! Top-level UI layout: one bordered view plus a status bar.

pub mod help;
pub mod main_chart;
pub mod status_bar;
pub mod top_table;

use perfwatch_core::domain::Window;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} | {} ", app.mode.label(), app.source))
        .title_style(theme::panel_title(true));
    let inner = block.inner(main_area);
    f.render_widget(block, main_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    f.render_widget(Paragraph::new(window_tabs(app.window)), parts[0]);

    match app.mode {
        Mode::MainChart => main_chart::render(f, parts[1], app),
        Mode::TopTable => top_table::render(f, parts[1], app),
    }

    status_bar::render(f, status_area, app);

    if app.show_help {
        help::render(f, centered_rect(70, 70, main_area));
    }
}

/// Window selector line, selected window highlighted.
fn window_tabs(selected: Window) -> Line<'static> {
    let mut spans = vec![Span::styled(" Window: ", theme::muted())];
    for window in Window::ALL {
        let label = format!(" {} {} ", window.index() + 1, window.short_label());
        let style = if window == selected {
            theme::accent_bold().add_modifier(ratatui::style::Modifier::REVERSED)
        } else {
            theme::muted()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfwatch_core::domain::{CatalogEntry, PerformanceRow};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> AppState {
        AppState::new(
            vec![
                PerformanceRow::new(
                    &CatalogEntry::new("Apple", "AAPL"),
                    [Some(2.0), Some(-12.5), Some(8.0), Some(30.0)],
                ),
                PerformanceRow::failed(&CatalogEntry::new("BadCo", "ZZZZ9")),
            ],
            "performance.csv",
            5,
        )
    }

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let r = centered_rect(50, 50, area);
        assert_eq!(r.width, 50);
        assert_eq!(r.height, 20);
        assert_eq!(r.x, 25);
        assert_eq!(r.y, 10);
    }

    #[test]
    fn main_chart_screen_shows_symbols() {
        let text = screen(&app());
        assert!(text.contains("Main Chart"));
        assert!(text.contains("AAPL"));
        assert!(text.contains("ZZZZ9"));
        assert!(text.contains("no data"));
    }

    #[test]
    fn main_chart_screen_shows_failure_reason() {
        let app = app().with_failure_reasons(vec![(
            "ZZZZ9".to_string(),
            "symbol not found: ZZZZ9".to_string(),
        )]);
        let text = screen(&app);
        assert!(text.contains("no data: symbol not found: ZZZZ9"));
    }

    #[test]
    fn top_table_screen_lists_leaders() {
        let mut app = app();
        app.set_mode(Mode::TopTable);
        app.select_window(Window::OneYear);
        let text = screen(&app);
        assert!(text.contains("Top 5"));
        assert!(text.contains("+30.00%"));
        assert!(!text.contains("ZZZZ9"));
    }

    #[test]
    fn help_overlay_renders() {
        let mut app = app();
        app.show_help = true;
        assert!(screen(&app).contains("Keyboard"));
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("Zürich Fund", 4), "Zür.");
        assert_eq!(truncate("ok", 4), "ok");
    }
}
