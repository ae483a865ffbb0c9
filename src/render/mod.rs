//! Matrix rendering: color mapping, draw surfaces and the draw loop.

pub mod colormap;
pub mod legend;
pub mod renderer;
pub mod surface;
pub mod terminal;

pub use colormap::{color_for, contrast_exponent, CellColor, ColorPalette, Rgba};
pub use legend::{legend_gradient, legend_samples};
pub use renderer::{
    axis_titles, DrawOutcome, DrawState, InnerVariableFilter, MatrixRenderer, RenderOptions,
    SelectionOverlay,
};
pub use surface::{DrawCommand, DrawRect, DrawSurface, Pattern, RecordingSurface, Transform};
pub use terminal::{blit_layers, TerminalSurface, PIXEL_COLUMNS};
