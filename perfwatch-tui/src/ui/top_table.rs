//! Top-N table for the selected window, best first.

use perfwatch_report::svg::format_pct;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::truncate;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let leaders = app.leaders();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        format!("Top {} Investments - {}", app.top_n, app.window.label()),
        theme::accent_bold(),
    )));
    lines.push(Line::from(""));

    if leaders.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("No investment has a {} value.", app.window.short_label()),
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "{:>3}  {:<36} {:<10} {:>12}",
            "#",
            "Investment Name",
            "Symbol",
            app.window.short_label()
        ),
        theme::accent_bold(),
    )));

    for (i, row) in leaders.iter().enumerate() {
        let value = row.get(app.window);
        lines.push(Line::from(vec![
            Span::styled(format!("{:>3}  ", i + 1), theme::muted()),
            Span::styled(format!("{:<36} ", truncate(&row.name, 36)), theme::secondary()),
            Span::styled(format!("{:<10} ", truncate(&row.symbol, 10)), theme::accent()),
            Span::styled(format!("{:>12}", format_pct(value)), theme::metric(value)),
        ]));
    }

    let excluded = app.rows.len() - leaders.len();
    if excluded > 0 && leaders.len() < app.top_n {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{excluded} investments without a value for this window"),
            theme::warning(),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}
