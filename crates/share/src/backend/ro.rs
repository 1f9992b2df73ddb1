//! Dry-run share backend.
//!
//! Wraps another backend and turns every remote mutation into a logged no-op
//! that reports success, so a whole batch can be rehearsed against the real
//! share without changing it.

use async_trait::async_trait;
use std::path::Path;

use crate::{RemoteShare, ShareEntry, ShareHandle, error::Result};

/// Read-only share backend.
///
/// Listing and downloads reach the wrapped share; uploads and renames are
/// dropped after emitting an [`info event`](tracing::Event).
#[derive(Clone)]
pub struct ReadOnlyShare {
    inner: ShareHandle,
}
impl ReadOnlyShare {
    pub fn new(inner: ShareHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl RemoteShare for ReadOnlyShare {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn list(&self, path: &Path) -> Result<Vec<ShareEntry>> {
        self.inner.list(path).await
    }

    async fn download(&self, path: &Path, local: &Path) -> Result<()> {
        self.inner.download(path, local).await
    }

    async fn upload(&self, data: &[u8], path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), bytes = data.len(), "Skipping upload during dry run");
        Ok(())
    }

    async fn rename(&self, entry: &ShareEntry, to: &Path) -> Result<()> {
        tracing::info!(path = %entry.path.display(), to = %to.display(), "Skipping rename during dry run");
        Ok(())
    }
}
