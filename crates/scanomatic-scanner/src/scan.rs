//! Main scanner implementation

use crate::error::{ScanError, ScanResult};
use crate::offsets::FormatOffsets;
use crate::stream::{EntryStream, HashSettings};
use crate::types::{format_crc, ArchiveEntry, ContainerKind, Diagnostic, DiagnosticKind};
use sevenz_rust::{Password, SevenZReader};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use zip::ZipArchive;

/// Read size used for full-content hashing
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// What scanning a single file produced
#[derive(Debug)]
pub enum ScanOutcome {
    /// The file opened, entries follow lazily
    Entries(EntryStream<'static>),
    /// The file could not be scanned and yields nothing
    Skipped(Diagnostic),
}

impl ScanOutcome {
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Entries(stream) => stream.diagnostic(),
            Self::Skipped(diagnostic) => Some(diagnostic),
        }
    }
}

/// The main scanner struct
#[derive(Debug, Clone)]
pub struct Scanner {
    offsets: Arc<FormatOffsets>,
    full_hash: bool,
    cleanup: bool,
    chunk_size: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(FormatOffsets::default())
    }
}

impl Scanner {
    /// Create a scanner with the given header offset table
    #[must_use]
    pub fn new(offsets: FormatOffsets) -> Self {
        Self {
            offsets: Arc::new(offsets),
            full_hash: false,
            cleanup: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Also compute an MD5 of every member
    #[must_use]
    pub fn with_full_hash(mut self, enabled: bool) -> Self {
        self.full_hash = enabled;
        self
    }

    /// Delete containers that fail to open
    ///
    /// Zero-byte containers are always deleted, regardless of this flag.
    #[must_use]
    pub fn with_cleanup(mut self, enabled: bool) -> Self {
        self.cleanup = enabled;
        self
    }

    /// Read size for member hashing
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Scan a container or plain file
    ///
    /// Corrupt and zero-byte containers come back as
    /// [`ScanOutcome::Skipped`]. An `Err` means the file itself could not
    /// be accessed.
    ///
    /// # Errors
    /// Returns an error if the file metadata cannot be read or the file
    /// cannot be opened
    pub fn scan_file(&self, path: &Path) -> ScanResult<ScanOutcome> {
        fs::metadata(path).map_err(|e| ScanError::file(path, e))?;

        match ContainerKind::from_path(path) {
            ContainerKind::Zip => self.open_zip(path),
            ContainerKind::SevenZip => self.open_seven_zip(path),
            ContainerKind::File => Ok(ScanOutcome::Entries(EntryStream::plain(
                path.to_path_buf(),
                self.settings(),
            ))),
        }
    }

    /// Scan a file and collect its entries
    ///
    /// # Errors
    /// Returns an error if the file cannot be accessed
    pub fn scan_entries(&self, path: &Path) -> ScanResult<Vec<ArchiveEntry>> {
        match self.scan_file(path)? {
            ScanOutcome::Entries(stream) => stream.collect(),
            ScanOutcome::Skipped(_) => Ok(Vec::new()),
        }
    }

    fn settings(&self) -> HashSettings {
        HashSettings {
            offsets: Arc::clone(&self.offsets),
            full_hash: self.full_hash,
            cleanup: self.cleanup,
            chunk_size: self.chunk_size,
        }
    }

    /// Open a container, returning it with its length
    fn open_container(path: &Path) -> ScanResult<(File, u64)> {
        let file = File::open(path).map_err(|e| ScanError::file(path, e))?;
        let len = file.metadata().map_err(|e| ScanError::file(path, e))?.len();
        Ok((file, len))
    }

    fn open_zip(&self, path: &Path) -> ScanResult<ScanOutcome> {
        let (file, len) = Self::open_container(path)?;
        if len == 0 {
            drop(file);
            return Ok(ScanOutcome::Skipped(dispose(
                path,
                DiagnosticKind::EmptyArchive,
                true,
            )));
        }

        match ZipArchive::new(file) {
            Ok(archive) => Ok(ScanOutcome::Entries(EntryStream::zip(
                path.to_path_buf(),
                archive,
                self.settings(),
            ))),
            Err(e) => Ok(ScanOutcome::Skipped(dispose(
                path,
                DiagnosticKind::Corrupt(e.to_string()),
                self.cleanup,
            ))),
        }
    }

    fn open_seven_zip(&self, path: &Path) -> ScanResult<ScanOutcome> {
        let (file, len) = Self::open_container(path)?;
        if len == 0 {
            drop(file);
            return Ok(ScanOutcome::Skipped(dispose(
                path,
                DiagnosticKind::EmptyArchive,
                true,
            )));
        }

        let reader = match SevenZReader::new(file, len, Password::empty()) {
            Ok(reader) => reader,
            Err(e) => {
                return Ok(ScanOutcome::Skipped(dispose(
                    path,
                    DiagnosticKind::Corrupt(e.to_string()),
                    self.cleanup,
                )));
            }
        };

        if self.full_hash {
            warn!(archive = ?path, "full-content hashing is not implemented for 7z archives");
        }

        // Only the metadata CRC is used; the offset table does not apply here.
        let entries = reader
            .archive()
            .files
            .iter()
            .filter(|entry| !entry.is_directory)
            .map(|entry| ArchiveEntry {
                path: path.to_path_buf(),
                file_name: entry.name.clone(),
                crc: format_crc(entry.crc as u32),
                size: entry.size.to_string(),
                kind: ContainerKind::SevenZip,
                matches: Vec::new(),
                md5: None,
            })
            .collect();

        Ok(ScanOutcome::Entries(EntryStream::listed(
            path.to_path_buf(),
            ContainerKind::SevenZip,
            entries,
        )))
    }
}

/// Record an unscannable container, deleting it when `remove` is set
///
/// A failed deletion is logged and reported through `removed: false`.
pub(crate) fn dispose(path: &Path, kind: DiagnosticKind, remove: bool) -> Diagnostic {
    let removed = remove
        && match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                warn!(archive = ?path, error = %e, "failed to delete archive");
                false
            }
        };

    let diagnostic = Diagnostic {
        path: path.to_path_buf(),
        kind,
        removed,
    };
    if removed {
        info!("{diagnostic}");
    } else {
        warn!("{diagnostic}");
    }
    diagnostic
}
