//! Keymap help bar UI component.

use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Keys of the matrix view.
pub const MATRIX_KEYMAP: &str = "q:quit | ←↑↓→:nav | m/M:mode | +-:contrast | i:invert | z:zeros | f:layout | t:target | c:context | x/y:filter | T:theme | Esc:clear | drag:select | ctrl+drag/wheel:pan/zoom";

/// Draw the keymap help bar.
pub fn draw_keymap(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let paragraph = Paragraph::new(MATRIX_KEYMAP).style(Style::default().fg(colors.fg0).bg(colors.bg0));

    f.render_widget(paragraph, area);
}
