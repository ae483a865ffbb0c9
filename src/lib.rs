//! Comatrix - A terminal viewer for contingency matrices.
//!
//! Comatrix turns a two-dimensional, optionally context-conditioned
//! contingency table into an interactive heatmap, colored by one of several
//! cell statistics.
//!
//! # Features
//!
//! - Mutual information, Hellinger and probability statistics per cell
//! - Drill-down over context dimensions and target slices
//! - Standard and frequency-weighted axis layouts
//! - Zoom, pan, keyboard navigation and hierarchy-aware selection
//! - Gruvbox color themes
//!
//! # Example
//!
//! ```ignore
//! use comatrix::data::MatrixInput;
//! use comatrix::matrix::{CellStatisticsBuilder, ContextSelection, MatrixMode, MatrixValueComputer};
//! use std::path::Path;
//!
//! let input = MatrixInput::read_file(Path::new("matrix.json"))?;
//! let matrix = CellStatisticsBuilder::new(&input).build();
//! let values = MatrixValueComputer::new(&matrix)
//!     .compute(MatrixMode::MutualInfo, &ContextSelection::default(), None);
//! println!("Total mutual information: {}", values.total());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod matrix;
pub mod navigation;
pub mod render;
pub mod selection;
pub mod settings;
pub mod summary;
pub mod ui;
pub mod viewport;

pub use error::{ComatrixError, Result};
