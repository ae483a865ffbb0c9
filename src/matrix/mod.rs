//! Matrix statistics engine.
//!
//! Turns a [`MatrixInput`](crate::data::MatrixInput) into positioned cells and
//! reduces their per-slice series to one displayed value per cell.

pub mod cells;
pub mod context;
pub mod mode;
pub mod partition;
pub mod stats;
pub mod values;

pub use cells::{CellExtra, CellModel, CellStatisticsBuilder, DisplayedValue, LayoutValue, MatrixCells};
pub use context::{parts_under_cluster, ContextIndex, ContextKey, ContextSelection};
pub use mode::{MatrixMode, ModeSelection, ParseModeError};
pub use partition::{breakpoints, frequency_breakpoints, standard_breakpoints, AxisLayout};
pub use values::{apply_displayed_values, ComputedValues, MatrixValueComputer};
