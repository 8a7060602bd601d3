//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested config file does not exist
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    IoError { path: PathBuf, message: String },

    /// TOML parse error
    #[error("TOML parse error in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Config could not be rendered back to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}
