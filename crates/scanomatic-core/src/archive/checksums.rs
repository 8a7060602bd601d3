//! Per-member content digests

use super::{open_archive, ArchiveResult};
use scanomatic_scanner::ProgressSink;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Digest used for member checksums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Hex digest of everything `reader` yields
    pub fn hash_reader<R: Read>(self, reader: R) -> io::Result<String> {
        match self {
            Self::Sha1 => hash_with::<Sha1, R>(reader),
            Self::Sha256 => hash_with::<Sha256, R>(reader),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        })
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(format!("Invalid digest algorithm: {s}")),
        }
    }
}

fn hash_with<D: Digest, R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest every file member of a zip archive
///
/// Returns member name -> hex digest. Directory members are skipped.
///
/// # Errors
/// Returns an error if the archive or a member cannot be read
pub fn member_checksums(
    zip_path: &Path,
    algorithm: DigestAlgorithm,
    progress: &mut dyn ProgressSink,
) -> ArchiveResult<BTreeMap<String, String>> {
    let mut archive = open_archive(zip_path)?;

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let member = archive.by_index_raw(index)?;
        if !member.is_dir() {
            members.push((index, member.name().to_string()));
        }
    }

    let total = members.len();
    progress.started(zip_path, total);

    let mut checksums = BTreeMap::new();
    for (done, (index, name)) in members.into_iter().enumerate() {
        let member = archive.by_index(index)?;
        let digest = algorithm.hash_reader(member)?;
        progress.advanced(&name, done + 1, total);
        checksums.insert(name, digest);
    }

    Ok(checksums)
}
