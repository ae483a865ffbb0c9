//! Minimal drawing surface abstraction.
//!
//! The renderer only needs to clear, resize, transform, fill, hatch and
//! stroke rectangles, so anything implementing [`DrawSurface`] can host a
//! matrix: the terminal grid in the viewer, or [`RecordingSurface`] in tests.

use super::colormap::{CellColor, Rgba};

/// Axis-aligned rectangle in surface or data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    /// Left (or bottom-left, in data space) corner.
    pub x: f64,
    /// Top (or bottom, in data space) corner.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl DrawRect {
    /// Create a rectangle.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Hatch pattern drawn over a filled cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Diagonal lines, marks zero exceptions.
    DiagonalHatch,
    /// Crossed lines, marks cells excluded by the inner-variable filter.
    CrossHatch,
}

/// 2D affine transform, `x' = a x + c y + e`, `y' = b x + d y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Horizontal scale.
    pub a: f64,
    /// Vertical skew.
    pub b: f64,
    /// Horizontal skew.
    pub c: f64,
    /// Vertical scale.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

impl Transform {
    /// Identity transform.
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Map data coordinates (origin bottom-left, y up) to surface coordinates.
    ///
    /// Inverted orientation puts the x data axis on the vertical and the y
    /// data axis on the horizontal.
    pub fn orientation(inverted: bool, height: f64) -> Self {
        if inverted {
            Self {
                a: 0.0,
                b: -1.0,
                c: 1.0,
                d: 0.0,
                e: 0.0,
                f: height,
            }
        } else {
            Self {
                a: 1.0,
                b: 0.0,
                c: 0.0,
                d: -1.0,
                e: 0.0,
                f: height,
            }
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Bounding box of a transformed rectangle.
    pub fn apply_rect(&self, rect: DrawRect) -> DrawRect {
        let (x0, y0) = self.apply(rect.x, rect.y);
        let (x1, y1) = self.apply(rect.x + rect.w, rect.y + rect.h);
        DrawRect {
            x: x0.min(x1),
            y: y0.min(y1),
            w: (x1 - x0).abs(),
            h: (y1 - y0).abs(),
        }
    }

    /// Inverse transform, `None` when singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Something the matrix can be drawn on.
///
/// Rectangles passed to the fill and stroke methods are in data coordinates
/// and go through the current transform.
pub trait DrawSurface {
    /// Backing store size in pixels, `(0, 0)` when unavailable.
    fn size(&self) -> (u32, u32);

    /// Resize the backing store.
    fn resize(&mut self, width: u32, height: u32);

    /// Erase everything.
    fn clear(&mut self);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Transform);

    /// Fill a rectangle with a color.
    fn fill_rect(&mut self, rect: DrawRect, color: CellColor);

    /// Overlay a hatch pattern on a rectangle.
    fn fill_pattern(&mut self, rect: DrawRect, pattern: Pattern);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: DrawRect, color: Rgba, line_width: f64);
}

/// A recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Backing store resized.
    Resize(u32, u32),
    /// Surface cleared.
    Clear,
    /// Transform replaced.
    SetTransform(Transform),
    /// Rectangle filled.
    Fill(DrawRect, CellColor),
    /// Pattern overlaid.
    Pattern(DrawRect, Pattern),
    /// Outline stroked.
    Stroke(DrawRect, Rgba, f64),
}

/// Surface that records every call, for tests and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    /// Calls since creation.
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create an empty, zero-sized surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded fills.
    pub fn fills(&self) -> impl Iterator<Item = (&DrawRect, &CellColor)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Fill(rect, color) => Some((rect, color)),
            _ => None,
        })
    }

    /// Recorded patterns.
    pub fn patterns(&self) -> impl Iterator<Item = (&DrawRect, &Pattern)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Pattern(rect, pattern) => Some((rect, pattern)),
            _ => None,
        })
    }

    /// Recorded strokes.
    pub fn strokes(&self) -> impl Iterator<Item = (&DrawRect, &Rgba, &f64)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Stroke(rect, color, width) => Some((rect, color, width)),
            _ => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize(width, height));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn fill_rect(&mut self, rect: DrawRect, color: CellColor) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }

    fn fill_pattern(&mut self, rect: DrawRect, pattern: Pattern) {
        self.commands.push(DrawCommand::Pattern(rect, pattern));
    }

    fn stroke_rect(&mut self, rect: DrawRect, color: Rgba, line_width: f64) {
        self.commands.push(DrawCommand::Stroke(rect, color, line_width));
    }
}
