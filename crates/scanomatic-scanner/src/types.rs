//! Shared types for the scanner

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of container a path refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Zip archive, members carry a stored CRC in the central directory
    #[serde(rename = "zip")]
    Zip,
    /// 7-Zip archive, only metadata CRCs are available
    #[serde(rename = "7z")]
    SevenZip,
    /// Anything else, hashed as a single opaque file
    #[serde(rename = "file")]
    File,
}

impl ContainerKind {
    /// Classify a path by its file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("zip") => Self::Zip,
            Some("7z") => Self::SevenZip,
            _ => Self::File,
        }
    }

    /// Tag written to the `type` field of an entry
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::SevenZip => "7z",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One member of a scanned container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Location of the container on disk
    pub path: PathBuf,
    /// Member name inside the container
    pub file_name: String,
    /// CRC32 as 8 lowercase hex digits
    pub crc: String,
    /// Decimal byte count after offset correction
    pub size: String,
    /// Container format tag
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    /// Cross-reference results, filled in by catalog matching
    #[serde(default)]
    pub matches: Vec<serde_json::Value>,
    /// MD5 of the member contents, only in full-hash mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
}

impl ArchiveEntry {
    /// Parsed size, `None` if the stored string is not a number
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.parse().ok()
    }
}

/// Why a file produced no entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The container was zero bytes long
    EmptyArchive,
    /// The container could not be read
    Corrupt(String),
}

/// Terminal result for a container that could not be scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Container path
    pub path: PathBuf,
    /// What went wrong
    pub kind: DiagnosticKind,
    /// Whether the file was deleted from disk
    pub removed: bool,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, self.removed) {
            (DiagnosticKind::EmptyArchive, true) => {
                write!(f, "archive is 0 bytes (deleted): {}", self.path.display())
            }
            (DiagnosticKind::EmptyArchive, false) => {
                write!(f, "archive is 0 bytes (delete failed): {}", self.path.display())
            }
            (DiagnosticKind::Corrupt(reason), true) => write!(
                f,
                "deleted corrupt archive: {} (reason: {reason})",
                self.path.display()
            ),
            (DiagnosticKind::Corrupt(reason), false) => {
                write!(f, "ERROR - archive ({reason}): {}", self.path.display())
            }
        }
    }
}

/// Render a CRC32 value as 8 lowercase hex digits
pub fn format_crc(crc: u32) -> String {
    format!("{crc:08x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(ContainerKind::from_path(Path::new("a/b.zip")), ContainerKind::Zip);
        assert_eq!(ContainerKind::from_path(Path::new("b.ZIP")), ContainerKind::Zip);
        assert_eq!(ContainerKind::from_path(Path::new("b.7z")), ContainerKind::SevenZip);
        assert_eq!(ContainerKind::from_path(Path::new("b.nes")), ContainerKind::File);
        assert_eq!(ContainerKind::from_path(Path::new("zip")), ContainerKind::File);
    }

    #[test]
    fn test_format_crc_pads() {
        assert_eq!(format_crc(0xDEAD_BEEF), "deadbeef");
        assert_eq!(format_crc(0x1), "00000001");
        assert_eq!(format_crc(0), "00000000");
    }

    #[test]
    fn test_entry_serialization_shape() {
        let entry = ArchiveEntry {
            path: PathBuf::from("/roms/set.zip"),
            file_name: "game.nes".to_string(),
            crc: "0a1b2c3d".to_string(),
            size: "100".to_string(),
            kind: ContainerKind::Zip,
            matches: Vec::new(),
            md5: None,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "zip");
        assert_eq!(value["size"], "100");
        assert_eq!(value["matches"], serde_json::json!([]));
        assert!(value.get("md5").is_none());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic {
            path: PathBuf::from("bad.zip"),
            kind: DiagnosticKind::Corrupt("bad magic".to_string()),
            removed: false,
        };
        assert_eq!(diag.to_string(), "ERROR - archive (bad magic): bad.zip");
    }
}
