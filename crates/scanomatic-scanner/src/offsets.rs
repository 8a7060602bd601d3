//! Header offsets for legacy ROM formats
//!
//! Some dumps carry a fixed-size header in front of the raw data. Catalogs
//! list the CRC of the data alone, so those bytes are skipped before hashing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Immutable extension -> byte offset table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatOffsets {
    offsets: BTreeMap<String, u64>,
}

impl FormatOffsets {
    /// Empty table, every member is hashed from byte 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Well-known header sizes for Atari 7800, Lynx and NES dumps
    #[must_use]
    pub fn legacy_consoles() -> Self {
        [("a78", 128), ("lnx", 64), ("nes", 16)].into_iter().collect()
    }

    /// Offset for an extension, 0 when unknown
    pub fn get(&self, extension: &str) -> u64 {
        self.offsets
            .get(&extension.to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Offset for a member name, looked up by its extension
    ///
    /// Returns `None` when the extension is not in the table, which tells the
    /// caller the stored CRC can be reused as is.
    pub fn for_member(&self, name: &str) -> Option<u64> {
        let extension = Path::new(name).extension()?.to_str()?;
        self.offsets.get(&extension.to_ascii_lowercase()).copied()
    }

    /// Return a copy with `other` layered on top
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut offsets = self.offsets.clone();
        offsets.extend(other.offsets.iter().map(|(k, v)| (k.clone(), *v)));
        Self { offsets }
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for FormatOffsets {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let offsets = iter
            .into_iter()
            .map(|(ext, offset)| {
                let ext = ext.as_ref().trim_start_matches('.').to_ascii_lowercase();
                (ext, offset)
            })
            .collect();
        Self { offsets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_is_zero() {
        let offsets = FormatOffsets::new();
        assert_eq!(offsets.get("nes"), 0);
        assert_eq!(offsets.for_member("game.nes"), None);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let offsets: FormatOffsets = [(".NES", 16)].into_iter().collect();
        assert_eq!(offsets.get("nes"), 16);
        assert_eq!(offsets.for_member("dir/Game.NeS"), Some(16));
        assert_eq!(offsets.for_member("readme.txt"), None);
        assert_eq!(offsets.for_member("noext"), None);
    }

    #[test]
    fn test_merged_overrides() {
        let base = FormatOffsets::legacy_consoles();
        let extra: FormatOffsets = [("nes", 0), ("fds", 16)].into_iter().collect();
        let merged = base.merged(&extra);

        assert_eq!(merged.get("nes"), 0);
        assert_eq!(merged.get("fds"), 16);
        assert_eq!(merged.get("a78"), 128);
        assert_eq!(merged.len(), 4);
    }
}
