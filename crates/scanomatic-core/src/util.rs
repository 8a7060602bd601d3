//! Path helpers for writing archive members to disk

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors related to path validation
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Member name escapes the destination: {0}")]
    TraversalAttempt(String),

    #[error("Path escapes destination directory: {0}")]
    EscapesRoot(String),

    #[error("Invalid member name: {0}")]
    InvalidComponent(String),

    #[error("Symlink not allowed: {0}")]
    SymlinkNotAllowed(String),
}

/// Join an archive member name onto a destination directory
///
/// Member names come from the archive and are untrusted: absolute names,
/// `..` components that climb above the destination, and NUL bytes are
/// rejected.
///
/// # Errors
/// Returns an error if the name would escape the destination
pub fn safe_join(root: &Path, member_name: &str) -> Result<PathBuf, PathError> {
    let normalized = normalize_member(member_name)?;
    if normalized.as_os_str().is_empty() {
        return Err(PathError::InvalidComponent(member_name.to_string()));
    }

    let joined = root.join(&normalized);
    verify_under_root(root, &joined)?;
    Ok(joined)
}

/// Normalize a member name, resolving `.` and `..` where they stay inside
fn normalize_member(name: &str) -> Result<PathBuf, PathError> {
    if name.contains('\0') {
        return Err(PathError::InvalidComponent("Null byte in name".to_string()));
    }

    // Zip names always use '/', but some writers emit '\'
    let name = name.replace('\\', "/");
    let mut normalized = PathBuf::new();
    let mut depth: usize = 0;

    for component in Path::new(&name).components() {
        match component {
            Component::Normal(c) => {
                normalized.push(c);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(PathError::TraversalAttempt(name.clone()));
                }
                normalized.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(PathError::InvalidComponent(format!(
                    "Absolute member name not allowed: {name}"
                )));
            }
        }
    }

    Ok(normalized)
}

/// Check that `path` stays inside `root` once links are resolved
///
/// Only the deepest ancestor that already exists is resolved. A member
/// extracted earlier (or anything else under `root`) may be a symlink to a
/// directory elsewhere, and writing below it would land outside `root`.
fn verify_under_root(root: &Path, path: &Path) -> Result<(), PathError> {
    let escapes = || PathError::EscapesRoot(path.display().to_string());
    if !path.starts_with(root) {
        return Err(escapes());
    }

    // A destination that does not exist yet has nothing linked below it
    let Ok(resolved_root) = root.canonicalize() else {
        return Ok(());
    };
    let existing = path.ancestors().find(|p| p.exists()).unwrap_or(root);
    let resolved = existing.canonicalize().map_err(|_| escapes())?;

    if resolved.starts_with(&resolved_root) {
        Ok(())
    } else {
        Err(escapes())
    }
}

/// Refuse to write through a symlink
///
/// # Errors
/// Returns an error if the path is a symlink
pub fn reject_symlink(path: &Path) -> Result<(), PathError> {
    if path.is_symlink() {
        return Err(PathError::SymlinkNotAllowed(path.display().to_string()));
    }
    Ok(())
}
