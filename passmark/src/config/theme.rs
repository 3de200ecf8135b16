use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use terminal_colorsaurus::QueryOptions;

/// General theme
#[derive(Debug, Deserialize, Serialize)]
pub struct Theme {
    pub text: TextTheme,
    pub mark: MarkTheme,
    pub term_fg: Color,
    pub term_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        let terminal_palette = terminal_colorsaurus::color_palette(QueryOptions::default()).ok();

        let (term_fg, term_bg) = if let Some(palette) = terminal_palette {
            let fg = palette.foreground.scale_to_8bit();
            let bg = palette.background.scale_to_8bit();
            (Color::Rgb(fg.0, fg.1, fg.2), Color::Rgb(bg.0, bg.1, bg.2))
        } else {
            (Color::Rgb(255, 255, 255), Color::Rgb(0, 0, 0))
        };

        Self {
            text: TextTheme::default(),
            mark: MarkTheme::default(),
            term_fg,
            term_bg,
        }
    }
}

/// Text color theme
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct TextTheme {
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub highlight: Color,
}

impl Default for TextTheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            highlight: Color::Blue,
        }
    }
}

/// Colors for marked spans and selection feedback
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkTheme {
    /// The pending first click of a span pair
    pub pending: Color,
    /// Marked span text
    pub span: Color,
    /// Positional labels like (A) or (a)
    pub label: Color,
    /// Spans carrying a substitute, and the correct choice
    pub answer: Color,
}

impl Default for MarkTheme {
    fn default() -> Self {
        Self {
            pending: Color::Blue,
            span: Color::Cyan,
            label: Color::Yellow,
            answer: Color::Red,
        }
    }
}
