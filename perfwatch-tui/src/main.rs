//! perfwatch TUI: `perfwatch-tui [PERFORMANCE_CSV]` or `perfwatch-tui --config <FILE>`.
//!
//! Rows are loaded (or the pipeline is run) before the terminal is touched.
//! Logs go to the configured log file only.

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use perfwatch_core::config::DEFAULT_CONFIG_FILE;
use perfwatch_core::logging::init_file_logging;
use perfwatch_core::AppConfig;
use perfwatch_tui::app::AppState;
use perfwatch_tui::source::{self, RowSource, TuiArgs};
use perfwatch_tui::{input, ui};

fn main() -> Result<()> {
    let row_source = TuiArgs::parse().row_source();

    let config_path = match &row_source {
        RowSource::Pipeline { config } => config.clone(),
        RowSource::Csv(_) => DEFAULT_CONFIG_FILE.into(),
    };
    let config = AppConfig::load_or_default(&config_path)?;
    let log_path = init_file_logging(&config.logging)?;

    let loaded = match &row_source {
        RowSource::Csv(path) => source::load_csv(path, config.output.top_n)?,
        RowSource::Pipeline { .. } => {
            println!("Fetching performance data (log: {})...", log_path.display());
            source::run_pipeline(&config, chrono::Local::now().date_naive())?
        }
    };
    let mut app = AppState::new(loaded.rows, loaded.label, loaded.top_n)
        .with_failure_reasons(loaded.failures);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    tracing::info!("dashboard closed");
    Ok(())
}
