//! Keyboard input dispatch: help overlay first, then global keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use perfwatch_core::domain::Window;

use crate::app::{AppState, Mode};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. The help overlay consumes input first.
    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter
        ) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false
        }
        KeyCode::Char('?') => app.show_help = true,

        KeyCode::Char('m') => app.set_mode(Mode::MainChart),
        KeyCode::Char('t') => app.set_mode(Mode::TopTable),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.select_window(app.window.prev());
            } else {
                app.select_window(app.window.next());
            }
        }
        KeyCode::BackTab => app.select_window(app.window.prev()),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            if let Some(window) = Window::from_index(index) {
                app.select_window(window);
            }
        }

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_top(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use perfwatch_core::domain::{CatalogEntry, PerformanceRow};

    fn app() -> AppState {
        let rows = (0..3)
            .map(|i| {
                PerformanceRow::new(
                    &CatalogEntry::new(format!("Fund {i}"), format!("F{i}")),
                    [Some(i as f64), Some(1.0), Some(2.0), Some(3.0)],
                )
            })
            .collect();
        AppState::new(rows, "test", 5)
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn mode_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.mode, Mode::TopTable);
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.mode, Mode::MainChart);
    }

    #[test]
    fn window_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.window, Window::OneYear);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.window, Window::OneMonth);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.window, Window::OneYear);
        handle_key(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT));
        assert_eq!(app.window, Window::SixMonth);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.window, Window::ThreeMonth);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.mode, Mode::MainChart);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn quit_and_scroll() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.scroll, 2);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.scroll, 1);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let release = KeyEvent {
            code: KeyCode::Char('t'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut app, release);
        assert_eq!(app.mode, Mode::MainChart);
    }
}
