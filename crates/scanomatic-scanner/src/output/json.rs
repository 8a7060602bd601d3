//! JSON output formatter

use crate::error::ScanResult;
use crate::types::ArchiveEntry;

/// Convert entries to a pretty-printed JSON array
///
/// # Errors
/// Returns an error if serialization fails
pub fn to_json(entries: &[ArchiveEntry]) -> ScanResult<String> {
    serde_json::to_string_pretty(entries).map_err(Into::into)
}

/// Convert entries to JSON lines, one object per line
///
/// # Errors
/// Returns an error if serialization fails
pub fn to_json_lines(entries: &[ArchiveEntry]) -> ScanResult<String> {
    let mut output = String::new();
    for entry in entries {
        output.push_str(&serde_json::to_string(entry)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContainerKind;
    use std::path::PathBuf;

    fn entry(name: &str) -> ArchiveEntry {
        ArchiveEntry {
            path: PathBuf::from("set.zip"),
            file_name: name.to_string(),
            crc: "00000000".to_string(),
            size: "0".to_string(),
            kind: ContainerKind::Zip,
            matches: Vec::new(),
            md5: None,
        }
    }

    #[test]
    fn test_json_lines() {
        let output = to_json_lines(&[entry("a.bin"), entry("b.bin")]).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["file_name"], "a.bin");
        assert_eq!(first["type"], "zip");
    }

    #[test]
    fn test_json_empty() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
        assert_eq!(to_json_lines(&[]).unwrap(), "");
    }
}
