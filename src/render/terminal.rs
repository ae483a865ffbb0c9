//! Draw surface backed by a pixel grid that is blitted into a terminal buffer.
//!
//! Terminal cells are about twice as tall as wide, so one pixel covers
//! [`PIXEL_COLUMNS`] columns of one row.

use super::colormap::{CellColor, Rgba};
use super::surface::{DrawRect, DrawSurface, Pattern, Transform};
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

/// Terminal columns per pixel.
pub const PIXEL_COLUMNS: u16 = 2;

const HATCH_COLOR: Color = Color::Rgb(60, 60, 60);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Pixel {
    fill: Option<Rgba>,
    mark: Option<char>,
}

/// Pixel grid draw surface.
#[derive(Debug, Clone, Default)]
pub struct TerminalSurface {
    width: u32,
    height: u32,
    transform: Transform,
    pixels: Vec<Pixel>,
}

impl TerminalSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill color of a pixel, `None` when transparent or out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.at(x, y).and_then(|p| p.fill)
    }

    /// Hatch glyph of a pixel.
    pub fn mark(&self, x: u32, y: u32) -> Option<char> {
        self.at(x, y).and_then(|p| p.mark)
    }

    fn at(&self, x: u32, y: u32) -> Option<&Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize)
    }

    /// Pixel span `[x0, x1) x [y0, y1)` covered by a data rectangle.
    fn span(&self, rect: DrawRect) -> (u32, u32, u32, u32) {
        let r = self.transform.apply_rect(rect);
        let clamp_x = |v: f64| v.round().clamp(0.0, f64::from(self.width)) as u32;
        let clamp_y = |v: f64| v.round().clamp(0.0, f64::from(self.height)) as u32;
        (clamp_x(r.x), clamp_y(r.y), clamp_x(r.x + r.w), clamp_y(r.y + r.h))
    }

    fn for_each_in(&mut self, rect: DrawRect, mut f: impl FnMut(u32, u32, &mut Pixel)) {
        let (x0, y0, x1, y1) = self.span(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = (y * self.width + x) as usize;
                if let Some(p) = self.pixels.get_mut(idx) {
                    f(x, y, p);
                }
            }
        }
    }
}

impl DrawSurface for TerminalSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Pixel::default(); (width as usize) * (height as usize)];
    }

    fn clear(&mut self) {
        self.pixels.fill(Pixel::default());
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, rect: DrawRect, color: CellColor) {
        let rgba = match color {
            CellColor::White => Rgba::rgb(255, 255, 255),
            CellColor::Rgba(rgba) => rgba,
        };
        self.for_each_in(rect, |_, _, p| {
            p.fill = Some(rgba);
            p.mark = None;
        });
    }

    fn fill_pattern(&mut self, rect: DrawRect, pattern: Pattern) {
        self.for_each_in(rect, |x, y, p| match pattern {
            Pattern::DiagonalHatch => {
                if (x + y) % 2 == 0 {
                    p.mark = Some('╱');
                }
            },
            Pattern::CrossHatch => p.mark = Some('╳'),
        });
    }

    fn stroke_rect(&mut self, rect: DrawRect, color: Rgba, line_width: f64) {
        let (x0, y0, x1, y1) = self.span(rect);
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let thickness = (line_width / 2.0).ceil().max(1.0) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                let edge = (x - x0).min(x1 - 1 - x).min(y - y0).min(y1 - 1 - y);
                if edge < thickness {
                    if let Some(p) = self.pixels.get_mut((y * self.width + x) as usize) {
                        p.fill = Some(color);
                    }
                }
            }
        }
    }
}

/// Copy a base and an overlay surface into a buffer area.
///
/// `scroll` is the pixel offset of the area's top-left corner.
pub fn blit_layers(
    base: &TerminalSurface,
    overlay: &TerminalSurface,
    buf: &mut Buffer,
    area: Rect,
    scroll: (u32, u32),
) {
    for row in 0..area.height {
        let py = scroll.1 + u32::from(row);
        for col in 0..area.width {
            let px = scroll.0 + u32::from(col / PIXEL_COLUMNS);
            let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                continue;
            };
            if let Some(stroke) = overlay.pixel(px, py) {
                cell.set_char('█').set_fg(stroke.to_color());
            } else if let Some(fill) = base.pixel(px, py) {
                match base.mark(px, py) {
                    Some(mark) => {
                        cell.set_char(mark).set_fg(HATCH_COLOR).set_bg(fill.to_color());
                    },
                    None => {
                        cell.set_char('█').set_fg(fill.to_color());
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: u32, h: u32) -> TerminalSurface {
        let mut s = TerminalSurface::new();
        s.resize(w, h);
        s.set_transform(Transform::orientation(false, f64::from(h)));
        s
    }

    #[test]
    fn test_fill_flips_vertical_axis() {
        let mut s = surface(4, 4);
        // Bottom-left quadrant in data space
        s.fill_rect(DrawRect::new(0.0, 0.0, 2.0, 2.0), CellColor::White);
        assert_eq!(s.pixel(0, 3), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(s.pixel(1, 2), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(s.pixel(0, 0), None);
        assert_eq!(s.pixel(3, 3), None);
    }

    #[test]
    fn test_clear_and_out_of_bounds() {
        let mut s = surface(2, 2);
        s.fill_rect(DrawRect::new(-5.0, -5.0, 50.0, 50.0), CellColor::White);
        assert!(s.pixel(1, 1).is_some());
        assert_eq!(s.pixel(2, 0), None);
        s.clear();
        assert_eq!(s.pixel(1, 1), None);
    }

    #[test]
    fn test_patterns_mark_pixels() {
        let mut s = surface(4, 2);
        s.fill_rect(DrawRect::new(0.0, 0.0, 4.0, 2.0), CellColor::White);
        s.fill_pattern(DrawRect::new(0.0, 0.0, 2.0, 2.0), Pattern::CrossHatch);
        s.fill_pattern(DrawRect::new(2.0, 0.0, 2.0, 2.0), Pattern::DiagonalHatch);
        assert_eq!(s.mark(0, 0), Some('╳'));
        assert_eq!(s.mark(2, 0), Some('╱'));
        assert_eq!(s.mark(3, 0), None);
    }

    #[test]
    fn test_stroke_ring() {
        let mut s = surface(6, 6);
        let red = Rgba::rgb(255, 0, 0);
        s.stroke_rect(DrawRect::new(0.0, 0.0, 6.0, 6.0), red, 2.0);
        assert_eq!(s.pixel(0, 0), Some(red));
        assert_eq!(s.pixel(5, 2), Some(red));
        assert_eq!(s.pixel(2, 2), None);
    }

    #[test]
    fn test_blit_overlay_wins() {
        let mut base = surface(2, 1);
        let mut overlay = surface(2, 1);
        base.fill_rect(DrawRect::new(0.0, 0.0, 2.0, 1.0), CellColor::Rgba(Rgba::rgb(1, 2, 3)));
        overlay.stroke_rect(DrawRect::new(1.0, 0.0, 1.0, 1.0), Rgba::rgb(9, 9, 9), 2.0);

        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        blit_layers(&base, &overlay, &mut buf, area, (0, 0));
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(1, 2, 3));
        assert_eq!(buf[(1, 0)].fg, Color::Rgb(1, 2, 3));
        assert_eq!(buf[(2, 0)].fg, Color::Rgb(9, 9, 9));
    }
}
