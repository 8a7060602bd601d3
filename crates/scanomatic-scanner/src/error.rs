//! Error types for the scanner
//!
//! Only failures that should stop a batch live here. A corrupt container is
//! not an error, it is a [`crate::Diagnostic`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur during scanning
#[derive(Error, Debug)]
pub enum ScanError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific file
    #[error("IO error for {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Failed to serialize scan output
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Path is not a directory
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),
}

impl ScanError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
