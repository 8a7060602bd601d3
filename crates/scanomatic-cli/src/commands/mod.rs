//! CLI command handlers
//!
//! Scanning lives in `scan`, zip editing in `archive`.

pub mod archive;
pub mod config;
pub mod scan;

use anyhow::{bail, Result};

/// Split a `KEY=VALUE` argument
pub fn split_pair<'a>(arg: &'a str, what: &str) -> Result<(&'a str, &'a str)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => Ok((key, value)),
        _ => bail!("Invalid {what} format: '{arg}'"),
    }
}
