//! Zip editing commands
//!
//! Handles: scanomatic checksums/extract/append/remove/rename/merge

use super::split_pair;
use anyhow::{Context, Result};
use clap::ValueEnum;
use scanomatic_core::archive::{self, MergeSources};
use scanomatic_core::{DigestAlgorithm, MergeMode};
use scanomatic_scanner::NoProgress;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum AlgorithmArg {
    Sha1,
    Sha256,
}

impl From<AlgorithmArg> for DigestAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Sha1 => Self::Sha1,
            AlgorithmArg::Sha256 => Self::Sha256,
        }
    }
}

pub fn checksums(zip: &Path, algorithm: DigestAlgorithm, json: bool) -> Result<()> {
    let checksums = archive::member_checksums(zip, algorithm, &mut NoProgress)
        .with_context(|| format!("Failed to read {}", zip.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&checksums)?);
    } else {
        for (name, digest) in &checksums {
            println!("{digest}  {name}");
        }
    }
    Ok(())
}

pub fn extract(zip: &Path, member: &str, dest: &Path) -> Result<()> {
    let written = archive::extract_member(zip, member, dest)?;
    println!("Extracted: {}", written.display());
    Ok(())
}

pub fn append(zip: &Path, file: &Path, name: Option<&str>) -> Result<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .with_context(|| format!("Cannot derive a member name from {}", file.display()))?,
    };

    archive::append_file(zip, file, &name)?;
    println!("Added '{name}' to {}", zip.display());
    Ok(())
}

pub fn remove(zip: &Path, member: &str) -> Result<()> {
    archive::remove_member(zip, member)?;
    println!("Removed '{member}' from {}", zip.display());
    Ok(())
}

pub fn rename(zip: &Path, renames: &[String]) -> Result<()> {
    let mut map = BTreeMap::new();
    for arg in renames {
        let (old, new) = split_pair(arg, "rename")?;
        map.insert(old.to_string(), new.to_string());
    }

    let renamed = archive::rename_members(zip, &map)?;
    println!("Renamed {renamed} member(s) in {}", zip.display());
    Ok(())
}

pub fn merge(target: &Path, source: PathBuf, members: &[String], append: bool) -> Result<()> {
    let mut selected = BTreeMap::new();
    for arg in members {
        let (name, new_name) = match arg.split_once('=') {
            Some(_) => split_pair(arg, "member")?,
            None => (arg.as_str(), arg.as_str()),
        };
        selected.insert(name.to_string(), new_name.to_string());
    }

    let mut sources = MergeSources::new();
    sources.insert(source, selected);

    let mode = if append {
        MergeMode::Append
    } else {
        MergeMode::Create
    };
    let copied = archive::merge_members(target, &sources, mode)?;
    println!("Copied {copied} member(s) into {}", target.display());
    Ok(())
}
