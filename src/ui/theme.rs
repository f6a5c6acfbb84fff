//! Color theme for the authentication forms.
//!
//! A single immutable value; nothing changes it at runtime.

use ratatui::style::{Color, Modifier, Style};

/// Primary border color - dark gray for minimal aesthetic
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color for highlights and the focused field
pub const COLOR_ACCENT: Color = Color::Rgb(255, 153, 0);

/// Header text color
pub const COLOR_HEADER: Color = Color::White;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Error text
pub const COLOR_ERROR: Color = Color::Red;

/// Background for input areas
pub const COLOR_INPUT_BG: Color = Color::Rgb(20, 20, 30);

/// Styles the gate's forms are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub container: Style,
    pub heading: Style,
    pub input: Style,
    pub input_focused: Style,
    pub button: Style,
    pub error: Style,
    pub hint: Style,
}

/// The one theme.
pub const THEME: Theme = Theme {
    container: Style::new().fg(COLOR_BORDER),
    heading: Style::new().fg(COLOR_HEADER).add_modifier(Modifier::BOLD),
    input: Style::new().fg(COLOR_HEADER).bg(COLOR_INPUT_BG),
    input_focused: Style::new().fg(COLOR_ACCENT).bg(COLOR_INPUT_BG),
    button: Style::new().fg(Color::Black).bg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
    error: Style::new().fg(COLOR_ERROR),
    hint: Style::new().fg(COLOR_DIM),
};

impl Default for Theme {
    fn default() -> Self {
        THEME
    }
}
