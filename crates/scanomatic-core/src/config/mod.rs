//! Scanner configuration
//!
//! Settings live in `config.toml` under the platform config directory:
//!
//! ```toml
//! cleanup_corrupt = false
//! full_hash = false
//! chunk_size = 16777216
//!
//! [offsets]
//! nes = 16
//! lnx = 64
//! ```

mod error;

pub use error::{ConfigError, ConfigResult};

use scanomatic_scanner::{FormatOffsets, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the config file
pub const CONFIG_FILE: &str = "config.toml";

/// Scanner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Delete containers that fail to open
    pub cleanup_corrupt: bool,
    /// Compute an MD5 of every member
    pub full_hash: bool,
    /// Read size for member hashing, in bytes
    pub chunk_size: usize,
    /// Header bytes to skip per member extension
    pub offsets: BTreeMap<String, u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cleanup_corrupt: false,
            full_hash: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            offsets: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Default config location, `<config_dir>/scanomatic/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scanomatic").join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        debug!(?path, offsets = config.offsets.len(), "loaded config");
        Ok(config)
    }

    /// Check invariants the scanner relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if let Some(ext) = self.offsets.keys().find(|k| k.trim_start_matches('.').is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid offset extension: '{ext}'"
            )));
        }
        Ok(())
    }

    /// Offset table to inject into the scanner
    pub fn format_offsets(&self) -> FormatOffsets {
        self.offsets.iter().map(|(ext, offset)| (ext, *offset)).collect()
    }

    /// Render as TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }
}
