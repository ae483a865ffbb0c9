//! Layout and view defaults of the terminal host.

use std::time::Duration;

/// Configuration of the matrix view.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Contrast used when none is stored.
    pub default_contrast: f64,
    /// Contrast change per key press.
    pub contrast_step: f64,
    /// Input poll timeout, one frame.
    pub frame_timeout: Duration,
    /// Width of the vertical axis label column.
    pub axis_label_width: u16,
    /// Height of the horizontal axis label row.
    pub axis_label_height: u16,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_contrast: 0.0,
            contrast_step: 5.0,
            frame_timeout: Duration::from_millis(100),
            axis_label_width: 14,
            axis_label_height: 1,
        }
    }
}

/// Configuration of the legend bar.
#[derive(Debug, Clone)]
pub struct LegendConfig {
    /// Rows reserved for the legend.
    pub height: u16,
    /// Width of the gradient in characters.
    pub width: usize,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            height: 1,
            width: 50,
        }
    }
}

/// Combined configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Matrix view.
    pub view: ViewConfig,
    /// Legend bar.
    pub legend: LegendConfig,
}
