//! Error types for Comatrix.
//!
//! The visualization engine itself never fails: numeric degeneracies resolve to
//! default values. Errors only arise while ingesting a matrix document.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Comatrix operations.
pub type Result<T> = std::result::Result<T, ComatrixError>;

/// Errors that can occur in Comatrix.
#[derive(Debug, Error)]
pub enum ComatrixError {
    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The matrix document is not valid JSON or does not match the schema.
    #[error("Invalid matrix document: {0}")]
    Json(#[from] serde_json::Error),

    /// The matrix document is well formed but inconsistent.
    #[error("Invalid matrix input: {reason}")]
    InvalidInput {
        /// Human readable reason.
        reason: String,
    },

    /// A hierarchy node references a parent that does not exist.
    #[error("Unknown parent cluster '{parent}' for '{child}'")]
    UnknownParent {
        /// Child cluster name.
        child: String,
        /// Missing parent name.
        parent: String,
    },
}

impl ComatrixError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create an UnknownParent error.
    pub fn unknown_parent(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UnknownParent {
            child: child.into(),
            parent: parent.into(),
        }
    }
}
