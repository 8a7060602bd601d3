//! Scanomatic Core - configuration and archive editing
//!
//! This crate loads the scanner configuration and provides the zip
//! operations used to maintain a collection: append, extract, remove,
//! rename, merge and per-member checksums.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

pub mod archive;
pub mod config;
pub mod util;

pub use scanomatic_scanner;

pub use archive::{ArchiveError, ArchiveResult, DigestAlgorithm, MergeMode};
pub use config::{Config, ConfigError};
