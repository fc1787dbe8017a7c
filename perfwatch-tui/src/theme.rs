//! Parrot/neon theme tokens for the perfwatch dashboard
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (primary highlights, focus, 1-month series)
//! - **Positive**: Neon green (gains, 3-month series)
//! - **Negative**: Hot pink (losses)
//! - **Warning**: Neon orange (missing data, 6-month series)
//! - **Neutral**: Cool purple (1-year series)
//! - **Muted**: Steel blue (secondary text, hints)

use perfwatch_core::domain::Window;
use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Parrot/neon theme
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: BACKGROUND,
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            neutral: NEUTRAL,
            muted: MUTED,
            text_primary: Color::White,
            text_secondary: TEXT_SECONDARY,
        }
    }

    /// Green for gains, pink for losses, orange when there is no value.
    pub fn metric_color(&self, value: Option<f64>) -> Color {
        match value {
            Some(v) if v >= 0.0 => self.positive,
            Some(_) => self.negative,
            None => self.warning,
        }
    }

    /// Series colour for a window in the main chart.
    pub fn series_color(&self, window: Window) -> Color {
        match window {
            Window::OneMonth => self.accent,
            Window::ThreeMonth => self.positive,
            Window::SixMonth => self.warning,
            Window::OneYear => self.neutral,
        }
    }
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn metric(value: Option<f64>) -> Style {
    Style::default().fg(Theme::default().metric_color(value))
}

pub fn series(window: Window) -> Style {
    Style::default().fg(Theme::default().series_color(window))
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}
