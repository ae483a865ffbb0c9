//! User interface rendering.

mod formatters;
mod keymap_bar;
mod matrix_view;
mod status_bar;
mod theme;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use formatters::{format_stat_value, format_total, truncate_to_width};
pub use keymap_bar::MATRIX_KEYMAP;
pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let colors = ThemeColors::from_theme(&app.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    matrix_view::draw_matrix(f, chunks[0], app, &colors);
    status_bar::draw_status(f, chunks[1], &app.status, &colors);
    keymap_bar::draw_keymap(f, chunks[2], &colors);
}
