use crate::error::{ErrorKind, Result};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const PREFIX: &str = ".smbpix-";

/// Local directory holding the temporary copies of remote files.
///
/// Every staged file gets a random name that ends in the entry's own name, so
/// concurrent steps never collide and the extension survives for format
/// detection. A staged file is deleted when dropped; [`NamedTempFile::close`]
/// deletes it explicitly and reports failure.
#[derive(Debug, Clone)]
pub struct Staging {
    root: PathBuf,
}
impl Staging {
    /// # Errors
    ///
    /// [`InvalidConfiguration`](ErrorKind::InvalidConfiguration) if `root` is
    /// not an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            exn::bail!(ErrorKind::InvalidConfiguration(format!(
                "staging directory {} does not exist",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create an empty staging file for the entry called `name`.
    pub fn stage(&self, name: &str) -> io::Result<NamedTempFile> {
        // The entry name is reduced to a single component; a share is free to
        // report names a local filesystem would read as paths.
        let name = name.replace(['/', '\\'], "_");
        tempfile::Builder::new().prefix(PREFIX).suffix(&format!("-{name}")).tempfile_in(&self.root)
    }
}
