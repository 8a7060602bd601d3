//! Single-archive edits

use super::{open_archive, persist, sibling_temp_file, ArchiveError, ArchiveResult};
use crate::util::{reject_symlink, safe_join};
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// What to do with a member while rewriting
enum MemberAction {
    Keep,
    Drop,
    Rename(String),
}

/// Add a file to a zip archive under `name`, creating the archive if needed
///
/// # Errors
/// Returns an error if `name` is already present or the archive cannot be
/// written
pub fn append_file(zip_path: &Path, source: &Path, name: &str) -> ArchiveResult<()> {
    let existing = zip_path.exists() && fs::metadata(zip_path)?.len() > 0;

    let mut writer = if existing {
        if open_archive(zip_path)?.file_names().any(|n| n == name) {
            return Err(ArchiveError::duplicate(zip_path, name));
        }
        let file = OpenOptions::new().read(true).write(true).open(zip_path)?;
        ZipWriter::new_append(file)?
    } else {
        ZipWriter::new(File::create(zip_path)?)
    };

    let mut input = File::open(source)?;
    let large = input.metadata()?.len() > u64::from(u32::MAX);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(large);

    info!(archive = ?zip_path, member = name, "appending file");
    writer.start_file(name, options)?;
    io::copy(&mut input, &mut writer)?;
    writer.finish()?;
    Ok(())
}

/// Extract one member below `destination`, returning the written path
///
/// The member keeps its relative path inside the archive.
///
/// # Errors
/// Returns an error if the member is missing, its name escapes
/// `destination`, or writing fails
pub fn extract_member(zip_path: &Path, name: &str, destination: &Path) -> ArchiveResult<PathBuf> {
    let mut archive = open_archive(zip_path)?;
    let mut member = match archive.by_name(name) {
        Ok(member) => member,
        Err(ZipError::FileNotFound) => return Err(ArchiveError::not_found(zip_path, name)),
        Err(e) => return Err(e.into()),
    };

    let target = safe_join(destination, member.name())?;
    if member.is_dir() {
        fs::create_dir_all(&target)?;
        return Ok(target);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    reject_symlink(&target)?;

    let mut output = File::create(&target)?;
    io::copy(&mut member, &mut output)?;
    Ok(target)
}

/// Remove a member from a zip archive
///
/// Remaining members are copied without recompression.
///
/// # Errors
/// Returns an error if the member is missing or the archive cannot be
/// rewritten
pub fn remove_member(zip_path: &Path, name: &str) -> ArchiveResult<()> {
    info!(archive = ?zip_path, member = name, "removing member");
    let removed = rewrite(zip_path, |member| {
        if member == name {
            MemberAction::Drop
        } else {
            MemberAction::Keep
        }
    })?;

    if removed == 0 {
        return Err(ArchiveError::not_found(zip_path, name));
    }
    Ok(())
}

/// Rename members of a zip archive, returning how many were renamed
///
/// Names not present in the archive are ignored.
///
/// # Errors
/// Returns an error if a new name collides with another member or the
/// archive cannot be rewritten
pub fn rename_members(zip_path: &Path, renames: &BTreeMap<String, String>) -> ArchiveResult<usize> {
    let names: Vec<String> = {
        let archive = open_archive(zip_path)?;
        archive.file_names().map(str::to_string).collect()
    };

    let mut final_names = HashSet::new();
    for name in &names {
        let final_name = renames.get(name).unwrap_or(name);
        if !final_names.insert(final_name.as_str()) {
            return Err(ArchiveError::duplicate(zip_path, final_name));
        }
    }

    rewrite(zip_path, |member| match renames.get(member) {
        Some(new_name) if new_name != member => {
            info!(archive = ?zip_path, from = member, to = %new_name, "renaming member");
            MemberAction::Rename(new_name.clone())
        }
        _ => MemberAction::Keep,
    })
}

/// Copy an archive member by member, applying `plan`
///
/// The archive is only replaced when at least one member changed.
fn rewrite<F>(zip_path: &Path, mut plan: F) -> ArchiveResult<usize>
where
    F: FnMut(&str) -> MemberAction,
{
    let mut archive = open_archive(zip_path)?;
    let mut writer = ZipWriter::new(sibling_temp_file(zip_path)?);
    let mut changed = 0usize;

    for index in 0..archive.len() {
        let member = archive.by_index_raw(index)?;
        let name = member.name().to_string();
        match plan(&name) {
            MemberAction::Keep => writer.raw_copy_file(member)?,
            MemberAction::Drop => changed += 1,
            MemberAction::Rename(new_name) => {
                writer.raw_copy_file_rename(member, new_name)?;
                changed += 1;
            }
        }
    }

    let temp = writer.finish()?;
    drop(archive);
    if changed > 0 {
        persist(temp, zip_path)?;
    }
    Ok(changed)
}
