//! Legend gradient for the current mode.

use super::colormap::{ColorPalette, Rgba};
use crate::matrix::MatrixMode;

/// CSS-style linear gradient describing the palette of a mode.
///
/// Diverging palettes run from the negative end through white to the
/// positive end; the sequential palette lists its stops in order.
pub fn legend_gradient(mode: MatrixMode) -> String {
    let palette = ColorPalette::for_mode(mode);
    let stops: Vec<String> = match palette {
        ColorPalette::Diverging => {
            let negative = palette.stops(true);
            let positive = palette.stops(false);
            negative
                .iter()
                .rev()
                .map(|s| (s.color, 50.0 - s.pct * 50.0))
                .chain(positive.iter().skip(1).map(|s| (s.color, 50.0 + s.pct * 50.0)))
                .map(|(color, pct)| format!("{} {}%", color, pct))
                .collect()
        },
        ColorPalette::Hot => palette
            .stops(false)
            .iter()
            .map(|s| format!("{} {}%", s.color, (s.pct * 100.0).round()))
            .collect(),
    };
    format!("linear-gradient(to right, {})", stops.join(", "))
}

/// Colors sampled evenly across the legend, left to right.
pub fn legend_samples(mode: MatrixMode, count: usize) -> Vec<Rgba> {
    let palette = ColorPalette::for_mode(mode);
    let (lo, hi) = match palette {
        ColorPalette::Diverging => (-1.0, 1.0),
        ColorPalette::Hot => (0.0, 1.0),
    };
    match count {
        0 => Vec::new(),
        1 => vec![palette.color(hi)],
        _ => (0..count)
            .map(|i| {
                let t = lo + (hi - lo) * i as f64 / (count - 1) as f64;
                palette.color(t)
            })
            .collect(),
    }
}
