//! UI rendering.
//!
//! The gate decides what is drawn: its forms while the user is not
//! authenticated, otherwise the routed shell (header, navigation sidebar,
//! the matched page, footer).

mod auth_forms;
mod helpers;
mod page;
mod shell;
mod theme;

pub use helpers::{column_widths, truncate_to_width};
pub use theme::{Theme, THEME};

use ratatui::Frame;

use crate::app::App;
use auth_forms::render_auth_form;
use shell::render_shell;

// ============================================================================
// Main UI Rendering
// ============================================================================

/// Render the UI for the current gate state
pub fn render(frame: &mut Frame, app: &App) {
    if app.gate.may_render_children() {
        render_shell(frame, app);
    } else {
        render_auth_form(frame, app);
    }
}
