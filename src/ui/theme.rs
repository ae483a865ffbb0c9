//! Color themes for the UI.

use crate::app::Theme;
use crate::render::Rgba;
use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Main background.
    pub bg0: Color,
    /// Status bar background.
    pub bg1: Color,
    /// Border color.
    pub bg2: Color,
    /// Primary text color.
    pub fg0: Color,
    /// Titles.
    pub yellow: Color,
    /// Labels.
    pub green: Color,
    /// Values.
    pub aqua: Color,
    /// Highlighted values.
    pub orange: Color,
    /// Muted text.
    pub gray: Color,
    /// Inner stroke of the selection highlight.
    pub selection: Rgba,
}

impl ThemeColors {
    /// Create color palette from theme.
    pub fn from_theme(theme: &Theme) -> Self {
        match theme {
            Theme::GruvboxDark => Self {
                bg0: Color::Rgb(40, 40, 40),
                bg1: Color::Rgb(60, 56, 54),
                bg2: Color::Rgb(102, 92, 84),
                fg0: Color::Rgb(235, 219, 178),
                yellow: Color::Rgb(250, 189, 47),
                green: Color::Rgb(184, 187, 38),
                aqua: Color::Rgb(142, 192, 124),
                orange: Color::Rgb(254, 128, 25),
                gray: Color::Rgb(146, 131, 116),
                selection: Rgba::rgb(69, 133, 136),
            },
            Theme::GruvboxLight => Self {
                bg0: Color::Rgb(251, 245, 234),
                bg1: Color::Rgb(235, 219, 178),
                bg2: Color::Rgb(213, 196, 161),
                fg0: Color::Rgb(60, 56, 54),
                yellow: Color::Rgb(181, 118, 20),
                green: Color::Rgb(121, 116, 14),
                aqua: Color::Rgb(66, 123, 88),
                orange: Color::Rgb(175, 58, 3),
                gray: Color::Rgb(124, 111, 100),
                selection: Rgba::rgb(7, 102, 120),
            },
        }
    }
}
