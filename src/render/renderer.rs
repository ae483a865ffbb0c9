//! Matrix draw loop.
//!
//! Redraw requests are coalesced: [`MatrixRenderer::request_draw`] only
//! marks a draw as pending and [`MatrixRenderer::on_frame`] performs it on
//! the next frame. Requests made while one is pending are dropped.

use super::colormap::{color_for, Rgba};
use super::legend::legend_gradient;
use super::surface::{DrawRect, DrawSurface, Pattern, Transform};
use crate::data::VariableNames;
use crate::matrix::{apply_displayed_values, AxisLayout, CellModel, ComputedValues, MatrixCells, MatrixMode};
use std::collections::HashSet;
use std::time::Instant;

/// Outer selection stroke, drawn first.
pub const SELECTION_OUTER_WIDTH: f64 = 4.0;
/// Inner selection stroke, drawn over the outer one.
pub const SELECTION_INNER_WIDTH: f64 = 2.0;
const SELECTION_OUTER_COLOR: Rgba = Rgba::rgb(255, 255, 255);

/// Draw loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawState {
    /// Nothing pending.
    #[default]
    Idle,
    /// A draw will run on the next frame.
    Drawing,
}

/// Cells hidden by a filter on the inner variables of the axes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InnerVariableFilter {
    excluded_x: HashSet<String>,
    excluded_y: HashSet<String>,
}

impl InnerVariableFilter {
    /// Check if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.excluded_x.is_empty() && self.excluded_y.is_empty()
    }

    /// Toggle exclusion of an x part, returns whether it is now excluded.
    pub fn toggle_x(&mut self, part: &str) -> bool {
        toggle(&mut self.excluded_x, part)
    }

    /// Toggle exclusion of a y part, returns whether it is now excluded.
    pub fn toggle_y(&mut self, part: &str) -> bool {
        toggle(&mut self.excluded_y, part)
    }

    /// Drop every exclusion.
    pub fn clear(&mut self) {
        self.excluded_x.clear();
        self.excluded_y.clear();
    }

    /// Check if a cell is excluded.
    pub fn excludes(&self, cell: &CellModel) -> bool {
        self.excluded_x.contains(&cell.xaxis_part) || self.excluded_y.contains(&cell.yaxis_part)
    }
}

fn toggle(set: &mut HashSet<String>, part: &str) -> bool {
    if set.remove(part) {
        false
    } else {
        set.insert(part.to_string());
        true
    }
}

/// View options of one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Mode of the computed values.
    pub mode: MatrixMode,
    /// Contrast, 0 to 100.
    pub contrast: f64,
    /// Largest absolute value, used to normalize colors.
    pub max_abs_value: f64,
    /// Swap the axes.
    pub axis_inverted: bool,
    /// Hatch zero exceptions.
    pub show_zero_exceptions: bool,
    /// Geometry layout.
    pub layout: AxisLayout,
    /// Canvas size in pixels (container size times zoom).
    pub dimensions: (u32, u32),
    /// Inner stroke color of the selection.
    pub selection_color: Rgba,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: MatrixMode::default(),
            contrast: 0.0,
            max_abs_value: 0.0,
            axis_inverted: false,
            show_zero_exceptions: false,
            layout: AxisLayout::Standard,
            dimensions: (0, 0),
            selection_color: Rgba::rgb(0, 0, 0),
        }
    }
}

/// Selected cells to highlight.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionOverlay<'a> {
    /// Indices of the selected cells.
    pub cells: &'a [usize],
    /// Highlight the whole matrix instead.
    pub top_level: bool,
}

/// Result of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// No draw was pending.
    Idle,
    /// The surface had no area, nothing was drawn.
    Skipped,
    /// The matrix was drawn.
    Drawn,
}

/// Draws matrix cells on a base and an overlay surface.
#[derive(Debug, Default)]
pub struct MatrixRenderer {
    state: DrawState,
    transform: Transform,
    extents: (f64, f64),
    legend: String,
}

impl MatrixRenderer {
    /// Create an idle renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draw state.
    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Ask for a redraw on the next frame.
    ///
    /// Returns false when a draw is already pending.
    pub fn request_draw(&mut self) -> bool {
        match self.state {
            DrawState::Idle => {
                self.state = DrawState::Drawing;
                true
            },
            DrawState::Drawing => false,
        }
    }

    /// Run the pending draw, if any.
    #[allow(clippy::too_many_arguments)]
    pub fn on_frame(
        &mut self,
        matrix: &mut MatrixCells,
        values: &ComputedValues,
        options: &RenderOptions,
        filter: &InnerVariableFilter,
        selection: SelectionOverlay<'_>,
        base: &mut dyn DrawSurface,
        overlay: &mut dyn DrawSurface,
    ) -> DrawOutcome {
        if self.state == DrawState::Idle {
            return DrawOutcome::Idle;
        }
        let outcome = self.draw(matrix, values, options, filter, selection, base, overlay);
        self.state = DrawState::Idle;
        outcome
    }

    #[allow(clippy::too_many_arguments)]
    fn draw(
        &mut self,
        matrix: &mut MatrixCells,
        values: &ComputedValues,
        options: &RenderOptions,
        filter: &InnerVariableFilter,
        selection: SelectionOverlay<'_>,
        base: &mut dyn DrawSurface,
        overlay: &mut dyn DrawSurface,
    ) -> DrawOutcome {
        let start = Instant::now();

        base.clear();
        overlay.clear();

        let (width, height) = options.dimensions;
        base.resize(width, height);
        overlay.resize(width, height);
        if width == 0 || height == 0 {
            tracing::debug!("Matrix surface has no area, draw skipped");
            return DrawOutcome::Skipped;
        }

        let (w, h) = (f64::from(width), f64::from(height));
        self.transform = Transform::orientation(options.axis_inverted, h);
        self.extents = if options.axis_inverted { (h, w) } else { (w, h) };
        base.set_transform(self.transform);
        overlay.set_transform(self.transform);

        matrix.update_canvas(options.layout, self.extents.0, self.extents.1);
        apply_displayed_values(matrix, values);

        for cell in &matrix.cells {
            let Some(shown) = cell.displayed_value else {
                continue;
            };
            let rect = cell_rect(cell);
            let color = color_for(shown.value, options.max_abs_value, options.contrast, options.mode);
            base.fill_rect(rect, color);
            if options.show_zero_exceptions
                && options.mode.flags_zero_exceptions()
                && shown.extra.is_zero_exception()
            {
                base.fill_pattern(rect, Pattern::DiagonalHatch);
            }
            if filter.excludes(cell) {
                base.fill_pattern(rect, Pattern::CrossHatch);
            }
        }

        if selection.top_level {
            let full = DrawRect::new(0.0, 0.0, self.extents.0, self.extents.1);
            stroke_selection(overlay, full, options.selection_color);
        } else {
            for cell in selection.cells.iter().filter_map(|&i| matrix.cells.get(i)) {
                stroke_selection(overlay, cell_rect(cell), options.selection_color);
            }
        }

        self.legend = legend_gradient(options.mode);

        tracing::debug!(
            "Matrix drawn in {:?} ({} cells, {}x{}, mode {})",
            start.elapsed(),
            matrix.cells.len(),
            width,
            height,
            options.mode
        );
        DrawOutcome::Drawn
    }

    /// Legend gradient of the last draw.
    pub fn legend(&self) -> &str {
        &self.legend
    }

    /// Transform of the last draw.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Index of the cell under a surface point.
    pub fn hit_test(&self, matrix: &MatrixCells, sx: f64, sy: f64) -> Option<usize> {
        let (x, y) = self.transform.invert()?.apply(sx, sy);
        matrix.cells.iter().find(|c| c.contains(x, y)).map(|c| c.index)
    }

    /// Surface rectangle covered by a cell.
    pub fn screen_rect(&self, cell: &CellModel) -> DrawRect {
        self.transform.apply_rect(cell_rect(cell))
    }
}

fn cell_rect(cell: &CellModel) -> DrawRect {
    DrawRect::new(cell.x_canvas, cell.y_canvas, cell.w_canvas, cell.h_canvas)
}

fn stroke_selection(surface: &mut dyn DrawSurface, rect: DrawRect, color: Rgba) {
    surface.stroke_rect(rect, SELECTION_OUTER_COLOR, SELECTION_OUTER_WIDTH);
    surface.stroke_rect(rect, color, SELECTION_INNER_WIDTH);
}

/// Axis titles as `(horizontal, vertical)` for an orientation.
pub fn axis_titles(names: &VariableNames, axis_inverted: bool) -> (&str, &str) {
    if axis_inverted {
        (&names.name_y, &names.name_x)
    } else {
        (&names.name_x, &names.name_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{context_input, small_input};
    use crate::matrix::{CellStatisticsBuilder, ContextSelection, MatrixValueComputer};
    use crate::render::colormap::CellColor;
    use crate::render::surface::{DrawCommand, RecordingSurface};

    fn options(mode: MatrixMode, values: &ComputedValues) -> RenderOptions {
        RenderOptions {
            mode,
            max_abs_value: values.max_abs(&Default::default()),
            dimensions: (300, 200),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_request_is_coalesced() {
        let mut renderer = MatrixRenderer::new();
        assert!(renderer.request_draw());
        assert!(!renderer.request_draw());
        assert_eq!(renderer.state(), DrawState::Drawing);

        let input = small_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::Frequency,
            &ContextSelection::default(),
            None,
        );
        let opts = options(MatrixMode::Frequency, &values);
        let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
        let filter = InnerVariableFilter::default();

        let first = renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &filter,
            SelectionOverlay::default(),
            &mut base,
            &mut overlay,
        );
        assert_eq!(first, DrawOutcome::Drawn);
        assert_eq!(renderer.state(), DrawState::Idle);
        assert_eq!(base.fills().count(), 6);

        let second = renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &filter,
            SelectionOverlay::default(),
            &mut base,
            &mut overlay,
        );
        assert_eq!(second, DrawOutcome::Idle);
        assert_eq!(base.fills().count(), 6);
    }

    #[test]
    fn test_draw_sequence() {
        let input = small_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::MutualInfo,
            &ContextSelection::default(),
            None,
        );
        let opts = options(MatrixMode::MutualInfo, &values);
        let mut renderer = MatrixRenderer::new();
        let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
        renderer.request_draw();
        renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &InnerVariableFilter::default(),
            SelectionOverlay::default(),
            &mut base,
            &mut overlay,
        );

        assert_eq!(base.commands[0], DrawCommand::Clear);
        assert_eq!(base.commands[1], DrawCommand::Resize(300, 200));
        assert_eq!(
            base.commands[2],
            DrawCommand::SetTransform(Transform::orientation(false, 200.0))
        );
        assert_eq!(base.size(), overlay.size());
        assert!(renderer.legend().contains("rgba(0,0,255,1)"));
        assert!(matrix.cells.iter().all(|c| c.displayed_value.is_some()));
    }

    #[test]
    fn test_zero_size_skips_draw() {
        let input = small_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::Frequency,
            &ContextSelection::default(),
            None,
        );
        let opts = RenderOptions {
            dimensions: (0, 120),
            ..options(MatrixMode::Frequency, &values)
        };
        let mut renderer = MatrixRenderer::new();
        let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
        renderer.request_draw();
        let outcome = renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &InnerVariableFilter::default(),
            SelectionOverlay::default(),
            &mut base,
            &mut overlay,
        );
        assert_eq!(outcome, DrawOutcome::Skipped);
        assert_eq!(base.fills().count(), 0);
        assert_eq!(renderer.state(), DrawState::Idle);
    }

    #[test]
    fn test_zero_exception_and_filter_hatches() {
        let input = context_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::MutualInfoTargetWithCell,
            &ContextSelection::default(),
            Some(0),
        );
        let opts = RenderOptions {
            show_zero_exceptions: true,
            ..options(MatrixMode::MutualInfoTargetWithCell, &values)
        };
        let mut filter = InnerVariableFilter::default();
        assert!(filter.toggle_x("A"));

        let mut renderer = MatrixRenderer::new();
        let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
        renderer.request_draw();
        renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &filter,
            SelectionOverlay::default(),
            &mut base,
            &mut overlay,
        );

        let diagonal = base
            .patterns()
            .filter(|(_, p)| **p == Pattern::DiagonalHatch)
            .count();
        let cross = base.patterns().filter(|(_, p)| **p == Pattern::CrossHatch).count();
        assert_eq!(diagonal, 1);
        // Column A holds two cells
        assert_eq!(cross, 2);
        // The zero-exception cell is still filled, in white
        assert!(base.fills().any(|(_, c)| *c == CellColor::White));
    }

    #[test]
    fn test_zero_exceptions_follow_mode_flag() {
        let input = context_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::MutualInfoTargetWithCell,
            &ContextSelection::default(),
            Some(0),
        );
        let opts = RenderOptions {
            show_zero_exceptions: true,
            ..options(MatrixMode::ProbCellWithTarget, &values)
        };

        let mut renderer = MatrixRenderer::new();
        let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
        renderer.request_draw();
        renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &InnerVariableFilter::default(),
            SelectionOverlay::default(),
            &mut base,
            &mut overlay,
        );

        assert!(base.fills().count() > 0);
        assert_eq!(base.patterns().count(), 0);
    }

    #[test]
    fn test_selection_strokes() {
        let input = small_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::Frequency,
            &ContextSelection::default(),
            None,
        );
        let opts = options(MatrixMode::Frequency, &values);
        let mut renderer = MatrixRenderer::new();
        let filter = InnerVariableFilter::default();

        let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
        renderer.request_draw();
        renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &filter,
            SelectionOverlay {
                cells: &[1, 4],
                top_level: false,
            },
            &mut base,
            &mut overlay,
        );
        let widths: Vec<f64> = overlay.strokes().map(|(_, _, w)| *w).collect();
        assert_eq!(widths, vec![4.0, 2.0, 4.0, 2.0]);

        let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
        renderer.request_draw();
        renderer.on_frame(
            &mut matrix,
            &values,
            &opts,
            &filter,
            SelectionOverlay {
                cells: &[1, 4],
                top_level: true,
            },
            &mut base,
            &mut overlay,
        );
        let strokes: Vec<_> = overlay.strokes().collect();
        assert_eq!(strokes.len(), 2);
        assert_eq!(*strokes[0].0, DrawRect::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_hit_test_both_orientations() {
        let input = small_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::Frequency,
            &ContextSelection::default(),
            None,
        );
        for inverted in [false, true] {
            let opts = RenderOptions {
                axis_inverted: inverted,
                ..options(MatrixMode::Frequency, &values)
            };
            let mut renderer = MatrixRenderer::new();
            let (mut base, mut overlay) = (RecordingSurface::new(), RecordingSurface::new());
            renderer.request_draw();
            renderer.on_frame(
                &mut matrix,
                &values,
                &opts,
                &InnerVariableFilter::default(),
                SelectionOverlay::default(),
                &mut base,
                &mut overlay,
            );
            for cell in &matrix.cells {
                let rect = renderer.screen_rect(cell);
                let hit = renderer.hit_test(&matrix, rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
                assert_eq!(hit, Some(cell.index));
            }
        }
    }

    #[test]
    fn test_axis_titles_swap() {
        let names = VariableNames {
            name_x: "Age".into(),
            name_y: "Job".into(),
        };
        assert_eq!(axis_titles(&names, false), ("Age", "Job"));
        assert_eq!(axis_titles(&names, true), ("Job", "Age"));
    }
}
