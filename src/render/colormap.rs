//! Color mapping functions for matrix cells.

use crate::matrix::MatrixMode;
use ratatui::style::Color;
use std::fmt;

/// An opaque-or-not RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Terminal color (alpha is dropped).
    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }
}

/// Color of a matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    /// Exactly zero values.
    White,
    /// Any other value.
    Rgba(Rgba),
}

impl CellColor {
    /// Terminal color.
    pub fn to_color(self) -> Color {
        match self {
            Self::White => Color::Rgb(255, 255, 255),
            Self::Rgba(rgba) => rgba.to_color(),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => f.write_str("white"),
            Self::Rgba(rgba) => rgba.fmt(f),
        }
    }
}

/// A palette stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub pct: f64,
    /// Color at that position.
    pub color: Rgba,
}

const fn stop(pct: f64, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        pct,
        color: Rgba::rgb(r, g, b),
    }
}

/// Sequential white → orange → red → black palette.
const HOT_STOPS: [ColorStop; 11] = [
    stop(0.0, 255, 255, 255),
    stop(0.1, 255, 240, 200),
    stop(0.2, 255, 224, 150),
    stop(0.3, 255, 200, 100),
    stop(0.4, 255, 170, 60),
    stop(0.5, 255, 140, 0),
    stop(0.6, 240, 90, 0),
    stop(0.7, 220, 40, 0),
    stop(0.8, 180, 0, 0),
    stop(0.9, 100, 0, 0),
    stop(1.0, 0, 0, 0),
];

const POSITIVE_STOPS: [ColorStop; 2] = [stop(0.0, 255, 255, 255), stop(1.0, 255, 0, 0)];

const NEGATIVE_STOPS: [ColorStop; 2] = [stop(0.0, 255, 255, 255), stop(1.0, 0, 0, 255)];

/// Palette used to color a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPalette {
    /// Sequential palette for non-negative statistics.
    Hot,
    /// White → red for positive, white → blue for negative values.
    Diverging,
}

impl ColorPalette {
    /// Palette for a mode.
    pub fn for_mode(mode: MatrixMode) -> Self {
        if mode.is_diverging() {
            Self::Diverging
        } else {
            Self::Hot
        }
    }

    /// Stops used for a value of the given sign.
    pub fn stops(self, negative: bool) -> &'static [ColorStop] {
        match (self, negative) {
            (Self::Hot, _) => &HOT_STOPS,
            (Self::Diverging, false) => &POSITIVE_STOPS,
            (Self::Diverging, true) => &NEGATIVE_STOPS,
        }
    }

    /// Map a signed value in `[-1, 1]` to a color.
    pub fn color(self, color_value: f64) -> Rgba {
        let negative = color_value < 0.0;
        let t = if color_value.is_finite() {
            color_value.abs().clamp(0.0, 1.0)
        } else {
            0.0
        };
        interpolate(self.stops(negative), t)
    }
}

/// Linear interpolation between the two stops bracketing `t`.
fn interpolate(stops: &[ColorStop], t: f64) -> Rgba {
    if stops.len() < 2 {
        return stops.first().map(|s| s.color).unwrap_or(Rgba::rgb(255, 255, 255));
    }
    let upper_idx = stops
        .iter()
        .position(|s| s.pct > t)
        .unwrap_or(stops.len() - 1)
        .max(1);
    let lower = stops[upper_idx - 1];
    let upper = stops[upper_idx];
    let range = upper.pct - lower.pct;
    let pct_upper = if range > 0.0 {
        ((t - lower.pct) / range).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let pct_lower = 1.0 - pct_upper;
    let mix = |a: u8, b: u8| (f64::from(a) * pct_lower + f64::from(b) * pct_upper).round() as u8;
    Rgba {
        r: mix(lower.color.r, upper.color.r),
        g: mix(lower.color.g, upper.color.g),
        b: mix(lower.color.b, upper.color.b),
        a: 255,
    }
}

/// Contrast exponent, `0.1^(contrast / 100)`.
pub fn contrast_exponent(contrast: f64) -> f64 {
    0.1f64.powf(contrast / 100.0)
}

/// Color of a cell value.
///
/// Zero is always white. Other values are scaled by `max_abs_value`,
/// compressed by the contrast exponent and looked up in the mode's palette.
pub fn color_for(value: f64, max_abs_value: f64, contrast: f64, mode: MatrixMode) -> CellColor {
    if value == 0.0 {
        return CellColor::White;
    }
    let c = contrast_exponent(contrast);
    let color_value = value.signum() * (value / max_abs_value).abs().powf(c);
    CellColor::Rgba(ColorPalette::for_mode(mode).color(color_value))
}
