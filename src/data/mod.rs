//! Matrix input contracts.
//!
//! This module defines the typed boundary of the engine: partitioned
//! dimensions, cluster hierarchies and the matrix document reader.

mod dimension;
mod report;
mod tree;

pub use dimension::{DimensionModel, DimensionType, Interval, Partition, ValueGroup, MISSING_LABEL};
pub use report::{MatrixInput, VariableNames};
pub use tree::{ClusterLink, ClusterTree, TreeNode, FLAT_ROOT_NAME};
