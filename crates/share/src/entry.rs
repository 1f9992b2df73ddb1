//! Share listing models.

use std::path::{Path, PathBuf};

/// A named node returned by a share directory listing.
///
/// Entries are immutable snapshots: they describe what the share reported at
/// listing time and are only valid for the traversal step that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareEntry {
    /// Final path component, exactly as the share reported it.
    pub name: String,
    /// Path relative to the share root.
    pub path: PathBuf,
    pub is_directory: bool,
}
impl ShareEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, false)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, true)
    }

    fn new(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        let path = path.into();
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        Self { name, path, is_directory }
    }

    /// Directory the entry lives in (the share root is the empty path).
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_path() {
        let entry = ShareEntry::file("to_be_renamed/set/photo.psd");
        assert_eq!(entry.name, "photo.psd");
        assert_eq!(entry.parent(), Path::new("to_be_renamed/set"));
        assert!(!entry.is_directory);
    }

    #[test]
    fn test_root_level_parent() {
        let entry = ShareEntry::directory("Conversion");
        assert_eq!(entry.parent(), Path::new(""));
        assert!(entry.is_directory);
    }
}
