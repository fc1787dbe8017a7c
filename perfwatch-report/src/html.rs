//! Self-contained interactive HTML dashboard.
//!
//! One page, no external assets: a window selector, the grouped main chart,
//! one chart + top-N table per window, and the rows embedded as JSON for
//! anything that wants to read the page programmatically.

use anyhow::{Context, Result};
use perfwatch_core::domain::{PerformanceRow, Window};

use crate::ranking::top_n;
use crate::svg::{self, escape, format_pct};

pub const PAGE_TITLE: &str = "Investment Performance Dashboard";

/// Render the dashboard page for `rows`.
pub fn render_interactive(rows: &[PerformanceRow], top: usize) -> Result<String> {
    let data = serde_json::to_string(rows).context("failed to serialize rows for dashboard")?;
    // keep the JSON from closing its own <script> element
    let data = data.replace("</", "<\\/");

    let mut page = String::with_capacity(16 * 1024);
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{PAGE_TITLE}</title>\n"));
    page.push_str(&style());
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("<h1>{PAGE_TITLE}</h1>\n"));

    page.push_str("<div class=\"controls\">\n<label for=\"window-select\">Window</label>\n");
    page.push_str("<select id=\"window-select\">\n");
    for window in Window::ALL {
        page.push_str(&format!(
            "<option value=\"{}\">{}</option>\n",
            window.key(),
            window.label()
        ));
    }
    page.push_str("</select>\n");
    page.push_str("<button id=\"show-main\" type=\"button\">View Main Chart</button>\n");
    page.push_str(&format!(
        "<button id=\"show-top\" type=\"button\">View Top {top} Table</button>\n"
    ));
    page.push_str("<span id=\"row-count\"></span>\n</div>\n");

    page.push_str("<section id=\"main-chart\" class=\"view\">\n");
    page.push_str(&svg::render_main_chart(rows));
    page.push_str("</section>\n");

    for window in Window::ALL {
        page.push_str(&format!(
            "<section id=\"view-{}\" class=\"view window-view\" hidden>\n",
            window.key()
        ));
        page.push_str(&svg::render_window_chart(rows, window, top));
        page.push_str(&top_table(rows, window, top));
        page.push_str("</section>\n");
    }

    page.push_str(&format!(
        "<script type=\"application/json\" id=\"performance-data\">{data}</script>\n"
    ));
    page.push_str(SCRIPT);
    page.push_str("</body>\n</html>\n");
    Ok(page)
}

fn top_table(rows: &[PerformanceRow], window: Window, top: usize) -> String {
    let leaders = top_n(rows, window, top);
    let mut html = format!(
        "<table class=\"top-table\" id=\"top-{}\">\n<caption>Top {top} Investments - {}</caption>\n\
         <thead><tr><th>#</th><th>Investment Name</th><th>Symbol</th><th>{}</th></tr></thead>\n<tbody>\n",
        window.key(),
        window.label(),
        window.label(),
    );
    if leaders.is_empty() {
        html.push_str("<tr><td colspan=\"4\">No data</td></tr>\n");
    }
    for (i, row) in leaders.iter().enumerate() {
        let value = row.get(window);
        let class = match value {
            Some(v) if v < 0.0 => "neg",
            _ => "pos",
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"{class}\">{}</td></tr>\n",
            i + 1,
            escape(&row.name),
            escape(&row.symbol),
            format_pct(value),
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn style() -> String {
    format!(
        "<style>\n\
         body {{ background: {bg}; color: {text}; font-family: monospace; margin: 1.5em; }}\n\
         h1 {{ color: {accent}; }}\n\
         .controls {{ margin-bottom: 1em; display: flex; gap: 0.75em; align-items: center; }}\n\
         select, button {{ background: #1e1e22; color: {accent}; border: 1px solid {muted}; padding: 0.3em 0.8em; }}\n\
         button.active {{ border-color: {accent}; }}\n\
         table {{ border-collapse: collapse; margin-top: 1em; }}\n\
         caption {{ color: {accent}; text-align: left; padding-bottom: 0.4em; }}\n\
         th, td {{ padding: 0.25em 1em; border-bottom: 1px solid #2a2a30; text-align: left; }}\n\
         th {{ color: {muted}; }}\n\
         td.pos {{ color: {pos}; }}\n\
         td.neg {{ color: {neg}; }}\n\
         #row-count {{ color: {muted}; }}\n\
         </style>\n",
        bg = svg::BACKGROUND,
        text = svg::TEXT,
        accent = svg::ACCENT,
        muted = svg::MUTED,
        pos = svg::POSITIVE,
        neg = svg::NEGATIVE,
    )
}

const SCRIPT: &str = r#"<script>
(function () {
  var select = document.getElementById("window-select");
  var main = document.getElementById("main-chart");
  var mode = "main";

  function render() {
    main.hidden = mode !== "main";
    document.querySelectorAll(".window-view").forEach(function (el) {
      el.hidden = mode !== "top" || el.id !== "view-" + select.value;
    });
    document.getElementById("show-main").classList.toggle("active", mode === "main");
    document.getElementById("show-top").classList.toggle("active", mode === "top");
  }

  document.getElementById("show-main").addEventListener("click", function () { mode = "main"; render(); });
  document.getElementById("show-top").addEventListener("click", function () { mode = "top"; render(); });
  select.addEventListener("change", function () { mode = "top"; render(); });

  var rows = JSON.parse(document.getElementById("performance-data").textContent);
  var failed = rows.filter(function (r) {
    return r["1 Month Performance"] === null && r["3 Month Performance"] === null &&
      r["6 Month Performance"] === null && r["1 Year Performance"] === null;
  }).length;
  document.getElementById("row-count").textContent =
    rows.length + " investments" + (failed ? ", " + failed + " without data" : "");

  render();
})();
</script>
"#;
