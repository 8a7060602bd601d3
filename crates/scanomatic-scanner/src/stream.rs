//! Lazy per-member entry iteration

use crate::checksum::{digest_reader, Digests};
use crate::error::{ScanError, ScanResult};
use crate::offsets::FormatOffsets;
use crate::progress::ProgressSink;
use crate::scan::dispose;
use crate::types::{format_crc, ArchiveEntry, ContainerKind, Diagnostic, DiagnosticKind};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Settings a stream needs to hash member data
#[derive(Debug, Clone)]
pub(crate) struct HashSettings {
    pub offsets: Arc<FormatOffsets>,
    pub full_hash: bool,
    pub cleanup: bool,
    pub chunk_size: usize,
}

enum Source {
    Zip(ZipMembers),
    Listed(std::vec::IntoIter<ArchiveEntry>),
    Plain(Option<HashSettings>),
    Done,
}

struct ZipMembers {
    archive: ZipArchive<File>,
    next_index: usize,
    settings: HashSettings,
}

/// Lazy, finite sequence of entries for one scanned file
///
/// Zip members are hashed one at a time as the stream is advanced. If a
/// member turns out to be corrupt the stream ends early and the reason is
/// available from [`EntryStream::diagnostic`]. Members the zip reader cannot
/// decode (encrypted, unknown compression) keep their stored CRC.
pub struct EntryStream<'p> {
    path: PathBuf,
    kind: ContainerKind,
    source: Source,
    total: usize,
    completed: usize,
    diagnostic: Option<Diagnostic>,
    progress: Option<&'p mut dyn ProgressSink>,
}

impl EntryStream<'static> {
    pub(crate) fn zip(path: PathBuf, archive: ZipArchive<File>, settings: HashSettings) -> Self {
        let total = archive.file_names().filter(|n| !n.ends_with('/')).count();
        Self::with_source(
            path,
            ContainerKind::Zip,
            Source::Zip(ZipMembers {
                archive,
                next_index: 0,
                settings,
            }),
            total,
        )
    }

    pub(crate) fn listed(path: PathBuf, kind: ContainerKind, entries: Vec<ArchiveEntry>) -> Self {
        let total = entries.len();
        Self::with_source(path, kind, Source::Listed(entries.into_iter()), total)
    }

    pub(crate) fn plain(path: PathBuf, settings: HashSettings) -> Self {
        Self::with_source(path, ContainerKind::File, Source::Plain(Some(settings)), 1)
    }

    fn with_source(path: PathBuf, kind: ContainerKind, source: Source, total: usize) -> Self {
        Self {
            path,
            kind,
            source,
            total,
            completed: 0,
            diagnostic: None,
            progress: None,
        }
    }
}

impl<'p> EntryStream<'p> {
    /// Attach a progress sink, reporting the member total immediately
    pub fn with_progress<'q>(self, sink: &'q mut dyn ProgressSink) -> EntryStream<'q> {
        sink.started(&self.path, self.total);
        EntryStream {
            path: self.path,
            kind: self.kind,
            source: self.source,
            total: self.total,
            completed: self.completed,
            diagnostic: self.diagnostic,
            progress: Some(sink),
        }
    }

    /// Why the stream ended early, if it did
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    pub fn into_diagnostic(self) -> Option<Diagnostic> {
        self.diagnostic
    }

    fn next_entry(&mut self) -> Option<ScanResult<ArchiveEntry>> {
        match &mut self.source {
            Source::Zip(members) => match members.next_member(&self.path) {
                Some(Ok(entry)) => Some(Ok(entry)),
                Some(Err(reason)) => {
                    let cleanup = members.settings.cleanup;
                    // The archive handle must be closed before the file can be removed
                    self.source = Source::Done;
                    self.diagnostic = Some(dispose(
                        &self.path,
                        DiagnosticKind::Corrupt(reason),
                        cleanup,
                    ));
                    None
                }
                None => None,
            },
            Source::Listed(entries) => entries.next().map(Ok),
            Source::Plain(settings) => {
                let settings = settings.take()?;
                Some(hash_plain_file(&self.path, &settings))
            }
            Source::Done => None,
        }
    }
}

impl Iterator for EntryStream<'_> {
    type Item = ScanResult<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.next_entry();
        match &item {
            Some(Ok(entry)) => {
                self.completed += 1;
                if let Some(sink) = self.progress.as_mut() {
                    sink.advanced(&entry.file_name, self.completed, self.total);
                }
            }
            Some(Err(_)) | None => self.source = Source::Done,
        }
        item
    }
}

impl std::fmt::Debug for EntryStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStream")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("total", &self.total)
            .field("completed", &self.completed)
            .field("diagnostic", &self.diagnostic)
            .finish_non_exhaustive()
    }
}

impl ZipMembers {
    /// Next file member, skipping directories. `Err` carries a corruption reason.
    fn next_member(&mut self, path: &Path) -> Option<Result<ArchiveEntry, String>> {
        while self.next_index < self.archive.len() {
            let index = self.next_index;
            self.next_index += 1;
            match self.read_member(path, index) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(reason) => return Some(Err(reason)),
            }
        }
        None
    }

    fn read_member(&mut self, path: &Path, index: usize) -> Result<Option<ArchiveEntry>, String> {
        let (name, stored_crc, stored_size) = {
            let member = self
                .archive
                .by_index_raw(index)
                .map_err(|e| e.to_string())?;
            if member.is_dir() {
                return Ok(None);
            }
            (member.name().to_string(), member.crc32(), member.size())
        };

        // Members with a known header are re-hashed without it; the stored
        // CRC covers the header too.
        let offset = self.settings.offsets.for_member(&name);
        let digests = Digests {
            crc: offset.is_some(),
            md5: self.settings.full_hash,
        };
        let skip = offset.unwrap_or(0);

        let digest = if digests.any() {
            match self.archive.by_index(index) {
                Ok(member) => Some(
                    digest_reader(member, skip, digests, self.settings.chunk_size)
                        .map_err(|e| format!("{name}: {e}"))?,
                ),
                // Encrypted members and unknown compression methods are valid
                // archive content; only the stored metadata is usable.
                Err(ZipError::UnsupportedArchive(reason)) => {
                    warn!(
                        archive = ?path,
                        member = %name,
                        reason,
                        "cannot read member data, using stored CRC"
                    );
                    None
                }
                Err(e) => return Err(e.to_string()),
            }
        } else {
            None
        };

        let crc = digest.as_ref().and_then(|d| d.crc).unwrap_or(stored_crc);
        let md5 = digest.as_ref().and_then(|d| d.md5_hex());
        debug!(archive = ?path, member = %name, offset = skip, "scanned member");

        Ok(Some(ArchiveEntry {
            path: path.to_path_buf(),
            file_name: name,
            crc: format_crc(crc),
            size: stored_size.saturating_sub(skip).to_string(),
            kind: ContainerKind::Zip,
            matches: Vec::new(),
            md5,
        }))
    }
}

fn hash_plain_file(path: &Path, settings: &HashSettings) -> ScanResult<ArchiveEntry> {
    let file = File::open(path).map_err(|e| ScanError::file(path, e))?;
    let digests = Digests {
        crc: true,
        md5: settings.full_hash,
    };
    let digest =
        digest_reader(file, 0, digests, settings.chunk_size).map_err(|e| ScanError::file(path, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(ArchiveEntry {
        path: path.to_path_buf(),
        file_name,
        crc: format_crc(digest.crc.unwrap_or(0)),
        size: digest.len.to_string(),
        kind: ContainerKind::File,
        matches: Vec::new(),
        md5: digest.md5_hex(),
    })
}
