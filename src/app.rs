//! Application state and logic.

use crate::config::Config;
use crate::data::MatrixInput;
use crate::matrix::{
    parts_under_cluster, AxisLayout, CellStatisticsBuilder, ComputedValues, ContextSelection,
    MatrixCells, MatrixMode, MatrixValueComputer, ModeSelection,
};
use crate::navigation::{next_cell, NavKey};
use crate::render::{
    DrawOutcome, InnerVariableFilter, MatrixRenderer, RenderOptions, Rgba, SelectionOverlay,
    TerminalSurface, PIXEL_COLUMNS,
};
use crate::selection::{cells_in_rect, expand_to_hierarchy};
use crate::settings::{self, MemoryStore, SettingsStore};
use crate::viewport::ZoomPanController;
use ratatui::layout::Rect;

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Notification emitted by the matrix view.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixEvent {
    /// Selection changed.
    CellSelected {
        /// Indices of the selected cells.
        cells: Vec<usize>,
        /// Keyboard-driven selections are not forwarded to linked views.
        stop_propagation: bool,
    },
    /// Axis orientation changed.
    AxisInverted(bool),
}

/// Initial view options.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// Mode to start in, otherwise the stored or default one.
    pub mode: Option<MatrixMode>,
    /// Contrast to start with, otherwise the stored or default one.
    pub contrast: Option<f64>,
    /// Initial zoom factor.
    pub zoom: Option<f64>,
    /// Start with swapped axes.
    pub inverted: bool,
    /// Start in the frequency layout.
    pub frequency_layout: bool,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Loaded matrix.
    pub input: MatrixInput,
    /// Cells built from the input.
    pub matrix: MatrixCells,
    /// Values of the current mode.
    pub values: ComputedValues,
    /// Mode selection.
    pub modes: ModeSelection,
    /// Contrast, 0 to 100.
    pub contrast: f64,
    /// Swapped axes.
    pub axis_inverted: bool,
    /// Hatch zero exceptions.
    pub show_zero_exceptions: bool,
    /// Geometry layout.
    pub layout: AxisLayout,
    /// Context slice picked as target.
    pub target: Option<usize>,
    /// Drill-down selection over the context dimensions.
    pub context: ContextSelection,
    /// Cluster of the first context dimension used for drill-down.
    pub context_cluster: Option<usize>,
    /// Cells hidden by the inner-variable filter.
    pub filter: InnerVariableFilter,
    /// Selected cell indices.
    pub selected: Vec<usize>,
    /// Whole-matrix selection.
    pub top_level: bool,
    /// Cell the keyboard cursor is on.
    pub current_cell: Option<usize>,
    /// Zoom and scroll.
    pub viewport: ZoomPanController,
    /// Terminal area of the matrix, set on each draw.
    pub matrix_area: Rect,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
    /// Layout defaults.
    pub config: Config,
    renderer: MatrixRenderer,
    base: TerminalSurface,
    overlay: TerminalSurface,
    store: MemoryStore,
    events: Vec<MatrixEvent>,
    rect_start: Option<usize>,
}

impl App {
    /// Create an application over a matrix.
    pub fn new(input: MatrixInput, options: ViewOptions) -> Self {
        Self::with_store(input, options, MemoryStore::new())
    }

    /// Create an application reading preferences from a store.
    pub fn with_store(input: MatrixInput, options: ViewOptions, store: MemoryStore) -> Self {
        let config = Config::default();
        let matrix = CellStatisticsBuilder::new(&input).build();

        let mut modes = ModeSelection::for_matrix(matrix.has_context());
        if let Some(idx) = settings::load_mode_index(&store) {
            modes.select_index(idx);
        }
        if let Some(mode) = options.mode {
            if !modes.select(mode) {
                tracing::warn!("Mode {} is not available for this matrix", mode);
            }
        }
        let contrast = options
            .contrast
            .or_else(|| settings::load_contrast(&store))
            .unwrap_or(config.view.default_contrast)
            .clamp(0.0, 100.0);

        let mut viewport = ZoomPanController::default();
        if let Some(zoom) = options.zoom {
            viewport.set_zoom(zoom);
        }

        let mut app = Self {
            input,
            matrix,
            values: ComputedValues::default(),
            modes,
            contrast,
            axis_inverted: options.inverted,
            show_zero_exceptions: false,
            layout: if options.frequency_layout {
                AxisLayout::Frequency
            } else {
                AxisLayout::Standard
            },
            target: None,
            context: ContextSelection::default(),
            context_cluster: None,
            filter: InnerVariableFilter::default(),
            selected: Vec::new(),
            top_level: true,
            current_cell: None,
            viewport,
            matrix_area: Rect::default(),
            status: "Ready".to_string(),
            theme: Theme::GruvboxDark,
            config,
            renderer: MatrixRenderer::new(),
            base: TerminalSurface::new(),
            overlay: TerminalSurface::new(),
            store,
            events: Vec::new(),
            rect_start: None,
        };
        app.refresh();
        app
    }

    /// Current mode.
    pub fn mode(&self) -> MatrixMode {
        self.modes.selected
    }

    /// Recompute values and schedule a redraw.
    pub fn refresh(&mut self) {
        let computer = MatrixValueComputer::new(&self.matrix);
        self.values = computer.compute(self.mode(), &self.context, self.target);
        self.renderer.request_draw();
    }

    /// Schedule a redraw without recomputing values.
    pub fn request_draw(&mut self) {
        self.renderer.request_draw();
    }

    /// Largest absolute value used to scale colors.
    pub fn max_abs_value(&self) -> f64 {
        self.values.max_abs(&self.input.min_max_values)
    }

    /// Legend gradient of the last draw.
    pub fn legend(&self) -> &str {
        self.renderer.legend()
    }

    /// Take the pending events.
    pub fn drain_events(&mut self) -> Vec<MatrixEvent> {
        std::mem::take(&mut self.events)
    }

    /// Select the next mode.
    pub fn next_mode(&mut self) {
        self.modes.select_next();
        self.mode_changed();
    }

    /// Select the previous mode.
    pub fn prev_mode(&mut self) {
        self.modes.select_prev();
        self.mode_changed();
    }

    fn mode_changed(&mut self) {
        settings::save_mode_index(&mut self.store, self.modes.selected_index());
        self.status = format!("Mode: {}", self.mode().name());
        tracing::debug!("Mode changed to {}", self.mode());
        self.refresh();
    }

    /// Change the contrast by a step, clamped to `[0, 100]`.
    pub fn adjust_contrast(&mut self, delta: f64) {
        self.contrast = (self.contrast + delta).clamp(0.0, 100.0);
        settings::save_contrast(&mut self.store, self.contrast);
        self.status = format!("Contrast: {}", self.contrast);
        self.request_draw();
    }

    /// Swap the axes.
    pub fn toggle_inverted(&mut self) {
        self.axis_inverted = !self.axis_inverted;
        self.events.push(MatrixEvent::AxisInverted(self.axis_inverted));
        self.status = format!(
            "Axes: {}",
            if self.axis_inverted { "inverted" } else { "normal" }
        );
        self.request_draw();
    }

    /// Toggle zero-exception hatching.
    pub fn toggle_zero_exceptions(&mut self) {
        self.show_zero_exceptions = !self.show_zero_exceptions;
        self.status = format!(
            "Zero exceptions: {}",
            if self.show_zero_exceptions { "ON" } else { "OFF" }
        );
        self.request_draw();
    }

    /// Switch between the standard and frequency layouts.
    pub fn toggle_layout(&mut self) {
        self.layout = self.layout.toggle();
        self.status = format!("Layout: {}", self.layout.name());
        self.request_draw();
    }

    /// Cycle the target slice, ending on "all slices".
    pub fn cycle_target(&mut self) {
        let slices = self.matrix.context.len();
        if !self.matrix.has_context() {
            self.status = "No context dimension".to_string();
            return;
        }
        self.target = match self.target {
            None => Some(0),
            Some(t) if t + 1 < slices => Some(t + 1),
            Some(_) => None,
        };
        self.status = match self.target {
            Some(t) => format!("Target: {}", self.slice_label(t)),
            None => "Target: all".to_string(),
        };
        self.refresh();
    }

    /// Label of a context slice, parts joined by `/`.
    pub fn slice_label(&self, pos: usize) -> String {
        let Some(key) = self.matrix.context.key(pos) else {
            return String::new();
        };
        key.iter()
            .zip(&self.input.contexts)
            .map(|(&part, dim)| dim.part_names().get(part).cloned().unwrap_or_default())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Cycle the drill-down cluster of the first context dimension.
    pub fn cycle_context(&mut self) {
        let (Some(dim), Some(tree)) = (self.input.contexts.first(), self.input.context_trees.first())
        else {
            self.status = "No context dimension".to_string();
            return;
        };
        let order = tree.preorder();
        self.context_cluster = match self
            .context_cluster
            .and_then(|c| order.iter().position(|&i| i == c))
        {
            None => order.first().copied(),
            Some(pos) => order.get(pos + 1).copied(),
        };
        match self.context_cluster.and_then(|c| tree.node(c)) {
            Some(node) => {
                let parts = parts_under_cluster(tree, &dim.part_names(), &node.name);
                self.status = format!("Context: {} ({} parts)", node.name, parts.len());
                self.context.set(0, parts);
            },
            None => {
                self.context.clear();
                self.status = "Context: all".to_string();
            },
        }
        self.refresh();
    }

    /// Toggle the inner-variable filter on the x part of the current cell.
    pub fn toggle_filter(&mut self) {
        let Some(cell) = self.current_cell.and_then(|i| self.matrix.cells.get(i)) else {
            self.status = "No cell selected".to_string();
            return;
        };
        let part = cell.xaxis_part.clone();
        let excluded = self.filter.toggle_x(&part);
        self.filter_status(&part, excluded);
    }

    /// Toggle the inner-variable filter on the y part of the current cell.
    pub fn toggle_row_filter(&mut self) {
        let Some(cell) = self.current_cell.and_then(|i| self.matrix.cells.get(i)) else {
            self.status = "No cell selected".to_string();
            return;
        };
        let part = cell.yaxis_part.clone();
        let excluded = self.filter.toggle_y(&part);
        self.filter_status(&part, excluded);
    }

    fn filter_status(&mut self, part: &str, excluded: bool) {
        self.status = format!(
            "Filter {}: {}",
            part,
            if excluded { "excluded" } else { "included" }
        );
        self.request_draw();
    }

    /// Move the keyboard cursor and select the cell reached.
    pub fn navigate(&mut self, key: NavKey) {
        let current = self.current_cell.unwrap_or(0);
        let next = if self.current_cell.is_none() {
            self.matrix.cells.get(current).map(|c| c.index)
        } else {
            next_cell(key, &self.matrix.cells, self.axis_inverted, current).map(|c| c.index)
        };
        if let Some(idx) = next {
            self.current_cell = Some(idx);
            self.select(vec![idx], true);
        }
    }

    /// Replace the selection.
    pub fn select(&mut self, cells: Vec<usize>, stop_propagation: bool) {
        self.top_level = cells.is_empty();
        self.selected = cells.clone();
        if let Some(&first) = cells.first() {
            self.status = self.describe_cell(first);
        }
        self.events.push(MatrixEvent::CellSelected {
            cells,
            stop_propagation,
        });
        self.request_draw();
    }

    /// Back to the whole-matrix selection.
    pub fn clear_selection(&mut self) {
        self.current_cell = None;
        self.select(Vec::new(), false);
        self.status = "Selection cleared".to_string();
    }

    /// One-line description of a cell and its displayed value.
    pub fn describe_cell(&self, idx: usize) -> String {
        let Some(cell) = self.matrix.cells.get(idx) else {
            return String::new();
        };
        let value = self.values.values.get(idx).copied().unwrap_or(0.0);
        let freq = self.values.freqs.get(idx).copied().unwrap_or(0.0);
        let expected = self.values.expected_freqs.get(idx).copied().unwrap_or(0.0);
        format!(
            "{} x {} | {}: {} | freq {} | expected {}",
            cell.xaxis_part_label,
            cell.yaxis_part_label,
            self.mode().name(),
            crate::ui::format_stat_value(value),
            crate::ui::format_stat_value(freq),
            crate::ui::format_stat_value(expected),
        )
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Set the terminal area of the matrix.
    pub fn set_matrix_area(&mut self, area: Rect) {
        let container = (u32::from(area.width / PIXEL_COLUMNS), u32::from(area.height));
        if area != self.matrix_area || self.viewport.container() != container {
            self.matrix_area = area;
            self.viewport.set_container(container.0, container.1);
            self.request_draw();
        }
    }

    /// Surface pixel under a terminal position, `None` outside the matrix.
    pub fn pixel_at(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.matrix_area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }
        let (sx, sy) = self.viewport.scroll_pixels();
        Some((
            f64::from(sx) + f64::from((column - area.x) / PIXEL_COLUMNS) + 0.5,
            f64::from(sy) + f64::from(row - area.y) + 0.5,
        ))
    }

    /// Cell under a terminal position.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        let (px, py) = self.pixel_at(column, row)?;
        self.renderer.hit_test(&self.matrix, px, py)
    }

    /// Select the cell under a terminal position.
    pub fn pick(&mut self, column: u16, row: u16) {
        self.rect_start = None;
        if let Some(idx) = self.cell_at(column, row) {
            self.current_cell = Some(idx);
            self.select(vec![idx], false);
        }
    }

    /// Start a rectangle selection.
    pub fn begin_rect(&mut self, column: u16, row: u16) {
        self.rect_start = self.cell_at(column, row);
    }

    /// Finish a rectangle selection and expand it along the hierarchies.
    pub fn finish_rect(&mut self, column: u16, row: u16) {
        let Some(start) = self.rect_start.take() else {
            return;
        };
        let Some(end) = self.cell_at(column, row) else {
            return;
        };
        let cells = &self.matrix.cells;
        let picked = cells_in_rect(&cells[start], &cells[end], cells);
        let expanded = expand_to_hierarchy(&picked, cells, &self.input.x_tree, &self.input.y_tree);
        let indices: Vec<usize> = expanded.iter().map(|c| c.index).collect();
        self.current_cell = Some(end);
        self.select(indices, false);
        self.status = format!("{} cells selected", self.selected.len());
    }

    /// Check if a rectangle selection is in progress.
    pub fn is_selecting_rect(&self) -> bool {
        self.rect_start.is_some()
    }

    /// Run the pending draw on the app's own surfaces.
    pub fn frame(&mut self, selection_color: Rgba) -> DrawOutcome {
        let options = RenderOptions {
            mode: self.mode(),
            contrast: self.contrast,
            max_abs_value: self.max_abs_value(),
            axis_inverted: self.axis_inverted,
            show_zero_exceptions: self.show_zero_exceptions,
            layout: self.layout,
            dimensions: self.viewport.dimensions(),
            selection_color,
        };
        let selection = SelectionOverlay {
            cells: &self.selected,
            top_level: self.top_level,
        };
        self.renderer.on_frame(
            &mut self.matrix,
            &self.values,
            &options,
            &self.filter,
            selection,
            &mut self.base,
            &mut self.overlay,
        )
    }

    /// Base and overlay surfaces of the last draw.
    pub fn surfaces(&self) -> (&TerminalSurface, &TerminalSurface) {
        (&self.base, &self.overlay)
    }

    /// Stored preferences.
    pub fn settings(&self) -> &dyn SettingsStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{context_input, hierarchical_input, small_input};
    use crate::data::{ClusterLink, ClusterTree};
    use crate::render::DrawSurface;

    fn drawn(input: MatrixInput) -> App {
        let mut app = App::new(input, ViewOptions::default());
        app.set_matrix_area(Rect::new(0, 0, 80, 20));
        assert_eq!(app.frame(Rgba::rgb(0, 0, 0)), DrawOutcome::Drawn);
        app
    }

    #[test]
    fn test_defaults() {
        let app = App::new(small_input(), ViewOptions::default());
        assert_eq!(app.mode(), MatrixMode::MutualInfo);
        assert_eq!(app.values.values.len(), 6);
        assert!(app.top_level);
    }

    #[test]
    fn test_mode_and_contrast_are_stored() {
        let mut app = App::new(small_input(), ViewOptions::default());
        app.next_mode();
        app.adjust_contrast(5.0);
        app.adjust_contrast(500.0);
        assert_eq!(
            settings::load_mode_index(app.settings()),
            Some(app.modes.selected_index())
        );
        assert_eq!(settings::load_contrast(app.settings()), Some(100.0));
    }

    #[test]
    fn test_store_restores_preferences() {
        let mut store = MemoryStore::new();
        settings::save_contrast(&mut store, 35.0);
        let app = App::with_store(small_input(), ViewOptions::default(), store);
        assert_eq!(app.contrast, 35.0);
    }

    #[test]
    fn test_invert_emits_event() {
        let mut app = App::new(small_input(), ViewOptions::default());
        app.toggle_inverted();
        assert_eq!(app.drain_events(), vec![MatrixEvent::AxisInverted(true)]);
        assert!(app.drain_events().is_empty());
    }

    #[test]
    fn test_navigation_selects_with_stop_propagation() {
        let mut app = drawn(small_input());
        app.navigate(NavKey::Up);
        app.navigate(NavKey::Up);
        assert_eq!(app.current_cell, Some(1));
        let events = app.drain_events();
        assert_eq!(
            events.last(),
            Some(&MatrixEvent::CellSelected {
                cells: vec![1],
                stop_propagation: true
            })
        );
        assert!(!app.top_level);
        app.clear_selection();
        assert!(app.top_level);
    }

    #[test]
    fn test_target_cycle() {
        let mut app = App::new(context_input(), ViewOptions::default());
        app.cycle_target();
        assert_eq!(app.target, Some(0));
        assert_eq!(app.slice_label(0), "yes");
        app.cycle_target();
        app.cycle_target();
        assert_eq!(app.target, None);

        let mut flat = App::new(small_input(), ViewOptions::default());
        flat.cycle_target();
        assert_eq!(flat.target, None);
    }

    #[test]
    fn test_context_cycle_covers_clusters() {
        let mut app = App::new(context_input(), ViewOptions::default());
        // Flat tree: root then the two leaves
        app.cycle_context();
        assert_eq!(app.context.parts(0), &[0, 1]);
        app.cycle_context();
        assert_eq!(app.context.parts(0), &[0]);
        app.cycle_context();
        app.cycle_context();
        assert!(app.context.is_empty());
    }

    #[test]
    fn test_context_cycle_starts_at_root_whatever_the_link_order() {
        let mut app = App::new(context_input(), ViewOptions::default());
        app.input.context_trees[0] = ClusterTree::from_links(&[
            ClusterLink::new("no", Some("all")),
            ClusterLink::new("yes", Some("all")),
            ClusterLink::new("all", None),
        ])
        .unwrap();
        app.cycle_context();
        assert_eq!(app.status, "Context: all (2 parts)");
        app.cycle_context();
        assert_eq!(app.status, "Context: no (1 parts)");
        app.cycle_context();
        app.cycle_context();
        assert!(app.context.is_empty());
    }

    #[test]
    fn test_pick_and_rect_selection() {
        let mut app = drawn(hierarchical_input());
        let (w, h) = app.surfaces().0.size();
        assert_eq!((w, h), (40, 20));
        // Bottom-left pixel column of the terminal holds cell (A, e)
        app.pick(0, 19);
        assert_eq!(app.selected, vec![0]);

        app.begin_rect(0, 19);
        assert!(app.is_selecting_rect());
        // Pixel (15, 14) lies in (B, f)
        app.finish_rect(30, 14);
        assert_eq!(app.selected, vec![0, 1, 4, 5]);
        assert!(!app.is_selecting_rect());
    }

    #[test]
    fn test_filter_toggles_current_column() {
        let mut app = drawn(small_input());
        app.toggle_filter();
        assert_eq!(app.status, "No cell selected");
        app.navigate(NavKey::Up);
        app.toggle_filter();
        assert!(!app.filter.is_empty());
        app.toggle_filter();
        assert!(app.filter.is_empty());
    }

    #[test]
    fn test_row_filter_toggles_current_row() {
        let mut app = drawn(small_input());
        app.navigate(NavKey::Up);
        let current = app.current_cell.unwrap();
        app.toggle_row_filter();
        let cell = &app.matrix.cells[current];
        assert!(app.filter.excludes(cell));
        assert!(app.status.ends_with("excluded"));
        assert!(app.status.contains(&cell.yaxis_part));
    }
}
