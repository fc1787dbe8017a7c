//! Static SVG charts.
//!
//! - Per-window chart: one bar per symbol around a zero baseline, with the
//!   top-N table for that window drawn underneath.
//! - Main chart: all four windows per symbol as grouped bars, with a legend.
//!
//! Palette follows the dashboard theme (neon accents on a dark background).

use perfwatch_core::domain::{PerformanceRow, Window};

use crate::ranking::{top_n, value_range};

pub const BACKGROUND: &str = "#121214";
pub const ACCENT: &str = "#00ffff";
pub const POSITIVE: &str = "#00ff80";
pub const NEGATIVE: &str = "#ff1493";
pub const WARNING: &str = "#ff8c00";
pub const NEUTRAL: &str = "#9370db";
pub const MUTED: &str = "#6495ed";
pub const TEXT: &str = "#aaaaaa";

/// Bar colour per window in the main chart, in [`Window::ALL`] order.
pub const SERIES_COLORS: [&str; 4] = [ACCENT, POSITIVE, WARNING, NEUTRAL];

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 24.0;
const PLOT_TOP: f64 = 56.0;
const PLOT_HEIGHT: f64 = 280.0;
const LABEL_AREA: f64 = 70.0;
const TABLE_ROW: f64 = 22.0;
const MIN_WIDTH: f64 = 560.0;

/// Escape text for XML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a metric for labels and tables.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.2}%"),
        None => "n/a".to_string(),
    }
}

/// Minimal SVG writer.
struct Canvas {
    buf: String,
}

impl Canvas {
    fn new(width: f64, height: f64) -> Self {
        let mut buf = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" \
             viewBox=\"0 0 {width:.0} {height:.0}\" font-family=\"monospace\">\n"
        );
        buf.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{BACKGROUND}\"/>\n"
        ));
        Self { buf }
    }

    fn rect(&mut self, class: &str, x: f64, y: f64, w: f64, h: f64, fill: &str, title: &str) {
        self.buf.push_str(&format!(
            "<rect class=\"{class}\" x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" \
             fill=\"{fill}\"><title>{}</title></rect>\n",
            escape(title)
        ));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) {
        self.buf.push_str(&format!(
            "<line x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\" stroke=\"{stroke}\" stroke-width=\"1\"/>\n"
        ));
    }

    fn text(&mut self, x: f64, y: f64, anchor: &str, size: u32, fill: &str, content: &str) {
        self.buf.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"{anchor}\" font-size=\"{size}\" fill=\"{fill}\">{}</text>\n",
            escape(content)
        ));
    }

    fn text_rotated(&mut self, x: f64, y: f64, size: u32, fill: &str, content: &str) {
        self.buf.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"{size}\" fill=\"{fill}\" \
             transform=\"rotate(-45 {x:.1} {y:.1})\">{}</text>\n",
            escape(content)
        ));
    }

    fn finish(mut self) -> String {
        self.buf.push_str("</svg>\n");
        self.buf
    }
}

/// Maps percentages to vertical pixel positions.
struct Scale {
    min: f64,
    max: f64,
    top: f64,
    height: f64,
}

impl Scale {
    fn new((min, max): (f64, f64), top: f64, height: f64) -> Self {
        let pad = (max - min).abs() * 0.1;
        let min = if min < 0.0 { min - pad } else { min };
        let max = if max > 0.0 { max + pad } else { max };
        Self {
            min,
            max,
            top,
            height,
        }
    }

    fn y(&self, v: f64) -> f64 {
        self.top + (self.max - v) / (self.max - self.min) * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Gridlines and tick labels, plus the zero baseline.
    fn draw_axis(&self, canvas: &mut Canvas, left: f64, right: f64) {
        const TICKS: usize = 5;
        for i in 0..=TICKS {
            let v = self.min + (self.max - self.min) * i as f64 / TICKS as f64;
            let y = self.y(v);
            canvas.line(left, y, right, y, "#2a2a30");
            canvas.text(left - 6.0, y + 4.0, "end", 11, TEXT, &format!("{v:.1}%"));
        }
        let zero = self.y(0.0);
        canvas.line(left, zero, right, zero, MUTED);
    }

    /// Bar from the zero baseline to `v`: `(y, height)`.
    fn bar(&self, v: f64) -> (f64, f64) {
        let zero = self.y(0.0);
        let end = self.y(v);
        (zero.min(end), (zero - end).abs().max(1.0))
    }
}

/// Chart of one window for every row, with the top-N table embedded below.
pub fn render_window_chart(rows: &[PerformanceRow], window: Window, top: usize) -> String {
    const SLOT: f64 = 48.0;
    const BAR: f64 = 30.0;

    let plot_width = SLOT * rows.len().max(1) as f64;
    let width = (MARGIN_LEFT + plot_width + MARGIN_RIGHT).max(MIN_WIDTH);
    let table_top = PLOT_TOP + PLOT_HEIGHT + LABEL_AREA;
    let leaders = top_n(rows, window, top);
    let height = table_top + TABLE_ROW * (leaders.len() as f64 + 3.0);

    let mut canvas = Canvas::new(width, height);
    canvas.text(
        width / 2.0,
        28.0,
        "middle",
        16,
        ACCENT,
        &format!("{} (%)", window.label()),
    );

    let scale = Scale::new(value_range(rows, &[window]), PLOT_TOP, PLOT_HEIGHT);
    scale.draw_axis(&mut canvas, MARGIN_LEFT, MARGIN_LEFT + plot_width);

    for (i, row) in rows.iter().enumerate() {
        let x = MARGIN_LEFT + SLOT * i as f64 + (SLOT - BAR) / 2.0;
        let center = x + BAR / 2.0;
        match row.get(window) {
            Some(v) => {
                let (y, h) = scale.bar(v);
                let fill = if v >= 0.0 { POSITIVE } else { NEGATIVE };
                let tip = format!("{} ({}): {}", row.name, row.symbol, format_pct(Some(v)));
                canvas.rect("bar", x, y, BAR, h, fill, &tip);
            }
            None => canvas.text(center, scale.y(0.0) - 4.0, "middle", 10, WARNING, "n/a"),
        }
        canvas.text_rotated(center, scale.bottom() + 14.0, 11, TEXT, &row.symbol);
    }

    draw_top_table(&mut canvas, &leaders, window, top, table_top, width);
    canvas.finish()
}

fn draw_top_table(
    canvas: &mut Canvas,
    leaders: &[&PerformanceRow],
    window: Window,
    top: usize,
    table_top: f64,
    width: f64,
) {
    let right = width - MARGIN_RIGHT;
    canvas.text(
        MARGIN_LEFT,
        table_top,
        "start",
        14,
        ACCENT,
        &format!("Top {top} Investments - {}", window.label()),
    );

    let header_y = table_top + TABLE_ROW;
    canvas.text(MARGIN_LEFT, header_y, "start", 12, MUTED, "#");
    canvas.text(MARGIN_LEFT + 30.0, header_y, "start", 12, MUTED, "Investment Name");
    canvas.text(right - 110.0, header_y, "start", 12, MUTED, "Symbol");
    canvas.text(right, header_y, "end", 12, MUTED, window.short_label());
    canvas.line(MARGIN_LEFT, header_y + 6.0, right, header_y + 6.0, MUTED);

    if leaders.is_empty() {
        canvas.text(MARGIN_LEFT, header_y + TABLE_ROW, "start", 12, WARNING, "No data");
        return;
    }

    for (i, row) in leaders.iter().enumerate() {
        let y = header_y + TABLE_ROW * (i as f64 + 1.0);
        let value = row.get(window);
        let fill = match value {
            Some(v) if v < 0.0 => NEGATIVE,
            _ => POSITIVE,
        };
        canvas.buf.push_str("<g class=\"top-row\">\n");
        canvas.text(MARGIN_LEFT, y, "start", 12, TEXT, &(i + 1).to_string());
        canvas.text(MARGIN_LEFT + 30.0, y, "start", 12, TEXT, &truncate(&row.name, 36));
        canvas.text(right - 110.0, y, "start", 12, TEXT, &row.symbol);
        canvas.text(right, y, "end", 12, fill, &format_pct(value));
        canvas.buf.push_str("</g>\n");
    }
}

/// Grouped bar chart: the four windows side by side for every symbol.
pub fn render_main_chart(rows: &[PerformanceRow]) -> String {
    const BAR: f64 = 10.0;
    const GAP: f64 = 16.0;
    let slot = BAR * Window::ALL.len() as f64 + GAP;

    let plot_width = slot * rows.len().max(1) as f64;
    let width = (MARGIN_LEFT + plot_width + MARGIN_RIGHT).max(MIN_WIDTH);
    let height = PLOT_TOP + PLOT_HEIGHT + LABEL_AREA;

    let mut canvas = Canvas::new(width, height);
    canvas.text(
        MARGIN_LEFT,
        28.0,
        "start",
        16,
        ACCENT,
        "Investment Performance Over Time (%)",
    );

    // Legend, right-aligned on the title line
    let mut lx = width - MARGIN_RIGHT - 4.0 * 80.0;
    for window in Window::ALL {
        let color = SERIES_COLORS[window.index()];
        canvas.rect("legend", lx, 18.0, 10.0, 10.0, color, window.label());
        canvas.text(lx + 14.0, 27.0, "start", 11, TEXT, window.short_label());
        lx += 80.0;
    }

    let scale = Scale::new(value_range(rows, &Window::ALL), PLOT_TOP, PLOT_HEIGHT);
    scale.draw_axis(&mut canvas, MARGIN_LEFT, MARGIN_LEFT + plot_width);

    for (i, row) in rows.iter().enumerate() {
        let group_x = MARGIN_LEFT + slot * i as f64 + GAP / 2.0;
        for window in Window::ALL {
            let Some(v) = row.get(window) else {
                continue;
            };
            let x = group_x + BAR * window.index() as f64;
            let (y, h) = scale.bar(v);
            let tip = format!("{} {}: {}", row.symbol, window.label(), format_pct(Some(v)));
            canvas.rect("bar", x, y, BAR, h, SERIES_COLORS[window.index()], &tip);
        }
        if row.is_empty() {
            canvas.text(
                group_x + BAR * 2.0,
                scale.y(0.0) - 4.0,
                "middle",
                10,
                WARNING,
                "n/a",
            );
        }
        canvas.text_rotated(
            group_x + BAR * 2.0,
            scale.bottom() + 14.0,
            11,
            TEXT,
            &row.symbol,
        );
    }

    canvas.finish()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 1).collect();
        format!("{head}.")
    }
}
