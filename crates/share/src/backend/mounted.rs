//! Mounted share backend.
//!
//! For shares already mounted into the local filesystem (CIFS, NFS, a
//! synced folder). All I/O goes through `tokio::fs`; the mount point plays
//! the role of the share root.

use crate::error::{ErrorKind, Result};
use crate::{RemoteShare, ShareEntry, path::validate as validate_path};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Share backend rooted at a local mount point.
///
/// # Examples
///
/// ```no_run
/// use smbpix_share::backend::MountedShare;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let share = MountedShare::new("studio", "/mnt/studio-assets")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MountedShare {
    name: String,
    /// Mount point of the share.
    root: PathBuf,
}
impl MountedShare {
    /// Create a backend for the share mounted at `root`.
    ///
    /// # Errors
    ///
    /// [`InvalidPath`](ErrorKind::InvalidPath) if the path is not absolute,
    /// [`Unavailable`](ErrorKind::Unavailable) if nothing is mounted there.
    /// Unlike a library root, a mount point is never created on demand.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if !root.is_dir() {
            exn::bail!(ErrorKind::Unavailable(root));
        }
        Ok(Self { name: name.into(), root })
    }

    fn absolute_path(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.root.join(validate_path(path)?))
    }
}

#[async_trait]
impl RemoteShare for MountedShare {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self, path: &Path) -> Result<Vec<ShareEntry>> {
        let relative = validate_path(path).or_raise(|| ErrorKind::Unavailable(path.to_path_buf()))?;
        let absolute = self.root.join(&relative);
        let unavailable = || ErrorKind::Unavailable(relative.clone());
        let mut dir = fs::read_dir(&absolute).await.or_raise(unavailable)?;
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await.or_raise(unavailable)? {
            // Follow symlinks; anything that isn't a plain file or directory
            // after that (dangling links, sockets) is left out.
            let metadata = match fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(err) => {
                    tracing::debug!(path = %entry.path().display(), %err, "Unreadable entry left out of listing");
                    continue;
                },
            };
            let child = relative.join(entry.file_name());
            if metadata.is_dir() {
                entries.push(ShareEntry::directory(child));
            } else if metadata.is_file() {
                entries.push(ShareEntry::file(child));
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn download(&self, path: &Path, local: &Path) -> Result<()> {
        let transfer = || ErrorKind::Transfer(path.to_path_buf());
        let source = self.absolute_path(path).or_raise(transfer)?;
        fs::copy(&source, local).await.or_raise(transfer)?;
        Ok(())
    }

    async fn upload(&self, data: &[u8], path: &Path) -> Result<()> {
        let transfer = || ErrorKind::Transfer(path.to_path_buf());
        let target = self.absolute_path(path).or_raise(transfer)?;
        fs::write(&target, data).await.or_raise(transfer)?;
        Ok(())
    }

    async fn rename(&self, entry: &ShareEntry, to: &Path) -> Result<()> {
        let rejected = || ErrorKind::Rename(to.to_path_buf());
        let from = self.absolute_path(&entry.path).or_raise(rejected)?;
        let target = self.absolute_path(to).or_raise(rejected)?;
        // `rename(2)` silently replaces an existing file; an SMB server refuses.
        if fs::try_exists(&target).await.or_raise(rejected)? {
            tracing::warn!(from = %entry.path.display(), to = %to.display(), "Rename target already exists");
            exn::bail!(rejected());
        }
        fs::rename(&from, &target).await.or_raise(rejected)?;
        Ok(())
    }
}
