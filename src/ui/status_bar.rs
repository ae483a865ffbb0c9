//! Status bar UI component.

use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the status bar.
pub fn draw_status(f: &mut Frame<'_>, area: Rect, status: &str, colors: &ThemeColors) {
    let paragraph = Paragraph::new(status.to_string()).style(Style::default().fg(colors.fg0).bg(colors.bg1));

    f.render_widget(paragraph, area);
}
