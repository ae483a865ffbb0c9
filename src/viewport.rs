//! Zoom and pan state of the matrix viewport.

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 1.0;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 15.0;
/// Zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 0.5;
/// Offset subtracted when re-anchoring the scroll position at the pointer.
pub const ANCHOR_MARGIN: f64 = 10.0;
/// Pixels scrolled per wheel notch without modifier.
pub const WHEEL_SCROLL_STEP: f64 = 3.0;

/// Round to one decimal and clamp to the zoom range.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if !zoom.is_finite() {
        return MIN_ZOOM;
    }
    ((zoom * 10.0).round() / 10.0).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Zoom factor, canvas size and scroll offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomPanController {
    zoom: f64,
    container: (u32, u32),
    scroll: (f64, f64),
    drag_origin: Option<(f64, f64)>,
}

impl Default for ZoomPanController {
    fn default() -> Self {
        Self::new((0, 0))
    }
}

impl ZoomPanController {
    /// Unzoomed controller for a container size.
    pub fn new(container: (u32, u32)) -> Self {
        Self {
            zoom: MIN_ZOOM,
            container,
            scroll: (0.0, 0.0),
            drag_origin: None,
        }
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, returns the applied value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.zoom = clamp_zoom(zoom);
        self.clamp_scroll();
        self.zoom
    }

    /// Visible area size.
    pub fn container(&self) -> (u32, u32) {
        self.container
    }

    /// Change the visible area size.
    pub fn set_container(&mut self, width: u32, height: u32) {
        self.container = (width, height);
        self.clamp_scroll();
    }

    /// Canvas size for the current zoom.
    pub fn dimensions(&self) -> (u32, u32) {
        dimensions(self.container, self.zoom)
    }

    /// Scroll offset, in canvas pixels.
    pub fn scroll(&self) -> (f64, f64) {
        self.scroll
    }

    /// Scroll offset rounded to whole pixels.
    pub fn scroll_pixels(&self) -> (u32, u32) {
        (self.scroll.0.round() as u32, self.scroll.1.round() as u32)
    }

    /// Largest scroll offset per axis.
    pub fn max_scroll(&self) -> (f64, f64) {
        let (w, h) = self.dimensions();
        (
            f64::from(w.saturating_sub(self.container.0)),
            f64::from(h.saturating_sub(self.container.1)),
        )
    }

    /// Scroll by a delta, clamped to the scrollable range.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll.0 += dx;
        self.scroll.1 += dy;
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let (mx, my) = self.max_scroll();
        self.scroll.0 = self.scroll.0.clamp(0.0, mx);
        self.scroll.1 = self.scroll.1.clamp(0.0, my);
    }

    /// Start a pan drag at a pointer position.
    pub fn start_drag(&mut self, x: f64, y: f64) {
        self.drag_origin = Some((x, y));
    }

    /// Continue a pan drag; the content follows the pointer.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if let Some((ox, oy)) = self.drag_origin {
            self.scroll_by(ox - x, oy - y);
            self.drag_origin = Some((x, y));
        }
    }

    /// End a pan drag.
    pub fn end_drag(&mut self) {
        self.drag_origin = None;
    }

    /// Check if a pan drag is active.
    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Handle a wheel notch at a pointer position inside the container.
    ///
    /// With the modifier held, a negative delta zooms in and a positive one
    /// zooms out, keeping the content under the pointer in view. Without
    /// it, the wheel scrolls vertically. Returns true when the zoom changed.
    pub fn wheel(&mut self, delta: f64, with_modifier: bool, pointer: (f64, f64)) -> bool {
        if !with_modifier {
            self.scroll_by(0.0, delta * WHEEL_SCROLL_STEP);
            return false;
        }
        let old = self.zoom;
        let target = if delta < 0.0 { old + ZOOM_STEP } else { old - ZOOM_STEP };
        let new = clamp_zoom(target);
        if new == old {
            return false;
        }
        self.zoom = new;
        let ratio = new / old;
        let anchor = |scroll: f64, p: f64| (scroll + p) * ratio - p - ANCHOR_MARGIN;
        self.scroll = (
            anchor(self.scroll.0, pointer.0),
            anchor(self.scroll.1, pointer.1),
        );
        self.clamp_scroll();
        tracing::debug!("Zoom {} -> {} at {:?}", old, new, pointer);
        true
    }
}

/// Canvas size for a container size and zoom factor.
pub fn dimensions(container: (u32, u32), zoom: f64) -> (u32, u32) {
    (
        (f64::from(container.0) * zoom).round() as u32,
        (f64::from(container.1) * zoom).round() as u32,
    )
}
