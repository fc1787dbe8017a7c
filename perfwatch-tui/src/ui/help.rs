//! Help overlay: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Views");
    key(&mut lines, "m", "Main chart: all four windows per investment");
    key(&mut lines, "t", "Top table: best investments for the selected window");
    lines.push(Line::from(""));

    section(&mut lines, "Window");
    key(&mut lines, "1-4", "1 Month / 3 Month / 6 Month / 1 Year");
    key(&mut lines, "Tab / Shift+Tab", "Next / previous window");
    lines.push(Line::from(""));

    section(&mut lines, "Navigation");
    key(&mut lines, "j / k", "Scroll the main chart");
    key(&mut lines, "g", "Back to the first investment");
    key(&mut lines, "?", "Toggle this help");
    key(&mut lines, "q / Esc", "Quit");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Keyboard ")
        .title_style(theme::panel_title(true));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
