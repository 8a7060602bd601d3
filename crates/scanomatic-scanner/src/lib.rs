//! Scanomatic Scanner - archive member discovery
//!
//! This crate walks zip and 7z containers (or plain files) and produces one
//! [`ArchiveEntry`] per member, carrying the CRC32 and size used to match
//! members against reference catalogs.
//!
//! Scanning is sequential and blocking. Corrupt or zero-byte containers are
//! reported as a [`Diagnostic`] instead of an error and may be deleted from
//! disk, see [`Scanner::with_cleanup`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::items_after_statements,
    clippy::single_match_else,
    clippy::match_same_arms,
    clippy::unnecessary_debug_formatting,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value,
    clippy::map_unwrap_or,
    clippy::manual_let_else,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

pub mod batch;
pub mod checksum;
pub mod error;
pub mod offsets;
pub mod output;
pub mod progress;
pub mod scan;
pub mod stream;
pub mod types;

pub use batch::{BatchProgress, ConsoleProgress, DirectoryReport};
pub use error::{ScanError, ScanResult};
pub use offsets::FormatOffsets;
pub use progress::{NoProgress, ProgressSink};
pub use scan::{ScanOutcome, Scanner, DEFAULT_CHUNK_SIZE};
pub use stream::EntryStream;
pub use types::{ArchiveEntry, ContainerKind, Diagnostic, DiagnosticKind};
