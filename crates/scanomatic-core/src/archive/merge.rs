//! Building archives from members of other archives

use super::{open_archive, persist, sibling_temp_file, ArchiveError, ArchiveResult};
use std::collections::{BTreeMap, HashSet};
use std::fs::OpenOptions;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipWriter;

/// Source archive -> (member name -> name in the target)
pub type MergeSources = BTreeMap<PathBuf, BTreeMap<String, String>>;

/// How the target archive is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Build a new archive, replacing any existing target
    #[default]
    Create,
    /// Add to the existing target, creating it if missing
    Append,
}

/// Copy selected members from `sources` into `target`
///
/// Members are copied without recompression. Every requested member is
/// checked before anything is written. Returns the number of members copied.
///
/// # Errors
/// Returns an error if a requested member is missing, a target name would be
/// duplicated, or any archive cannot be read or written
pub fn merge_members(target: &Path, sources: &MergeSources, mode: MergeMode) -> ArchiveResult<usize> {
    let mut taken: HashSet<String> = HashSet::new();
    let appending = mode == MergeMode::Append && target.exists();
    if appending {
        taken.extend(open_archive(target)?.file_names().map(str::to_string));
    }

    for (source, members) in sources {
        let archive = open_archive(source)?;
        let available: HashSet<&str> = archive.file_names().collect();
        for (name, new_name) in members {
            if !available.contains(name.as_str()) {
                return Err(ArchiveError::not_found(source, name));
            }
            if !taken.insert(new_name.clone()) {
                return Err(ArchiveError::duplicate(target, new_name));
            }
        }
    }

    if appending {
        let file = OpenOptions::new().read(true).write(true).open(target)?;
        let mut writer = ZipWriter::new_append(file)?;
        let copied = copy_members(&mut writer, sources)?;
        writer.finish()?;
        info!(archive = ?target, copied, "appended members");
        Ok(copied)
    } else {
        let mut writer = ZipWriter::new(sibling_temp_file(target)?);
        let copied = copy_members(&mut writer, sources)?;
        persist(writer.finish()?, target)?;
        info!(archive = ?target, copied, "created archive");
        Ok(copied)
    }
}

fn copy_members<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    sources: &MergeSources,
) -> ArchiveResult<usize> {
    let mut copied = 0usize;
    for (source, members) in sources {
        let mut archive = open_archive(source)?;
        copied += copy_from(writer, &mut archive, members)?;
    }
    Ok(copied)
}

fn copy_from<W: Write + Seek, R: Read + Seek>(
    writer: &mut ZipWriter<W>,
    archive: &mut zip::ZipArchive<R>,
    members: &BTreeMap<String, String>,
) -> ArchiveResult<usize> {
    let mut copied = 0usize;
    for index in 0..archive.len() {
        let member = archive.by_index_raw(index)?;
        if let Some(new_name) = members.get(member.name()) {
            let new_name = new_name.clone();
            writer.raw_copy_file_rename(member, new_name)?;
            copied += 1;
        }
    }
    Ok(copied)
}
