//! Zip archive editing
//!
//! `remove_member`, `rename_members` and `merge_members` in create mode build
//! the new archive in a temporary file next to the target and move it into
//! place once complete. `append_file` and `merge_members` in append mode add
//! to the existing archive in place.

mod checksums;
mod edit;
mod merge;

pub use checksums::{member_checksums, DigestAlgorithm};
pub use edit::{append_file, extract_member, remove_member, rename_members};
pub use merge::{merge_members, MergeMode, MergeSources};

use crate::util::PathError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors during archive editing
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] ZipError),

    #[error("Unsafe member path: {0}")]
    Path(#[from] PathError),

    #[error("Member '{name}' not found in {archive}")]
    MemberNotFound { archive: PathBuf, name: String },

    #[error("Member '{name}' already exists in {archive}")]
    DuplicateMember { archive: PathBuf, name: String },
}

impl ArchiveError {
    fn not_found(archive: &Path, name: &str) -> Self {
        Self::MemberNotFound {
            archive: archive.to_path_buf(),
            name: name.to_string(),
        }
    }

    fn duplicate(archive: &Path, name: &str) -> Self {
        Self::DuplicateMember {
            archive: archive.to_path_buf(),
            name: name.to_string(),
        }
    }
}

fn open_archive(path: &Path) -> ArchiveResult<ZipArchive<File>> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(file)?)
}

/// Temporary file in the same directory as `path`, so the final rename
/// stays on one filesystem
fn sibling_temp_file(path: &Path) -> ArchiveResult<NamedTempFile> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(tempfile::Builder::new()
        .prefix(".scanomatic-")
        .suffix(".zip.tmp")
        .tempfile_in(dir)?)
}

fn persist(temp: NamedTempFile, path: &Path) -> ArchiveResult<()> {
    temp.persist(path).map_err(|e| ArchiveError::Io(e.error))?;
    Ok(())
}
