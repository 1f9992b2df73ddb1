//! Remote share trait and implementations.
//!
//! This module defines the [`RemoteShare`] trait: the four operations both
//! batch pipelines need from an already-authenticated share session. Backends:
//!
//! - [`SmbClientShare`] drives the `smbclient` executable (feature `smbclient`).
//! - [`MountedShare`] works on a share mounted into the local filesystem.
//! - [`ReadOnlyShare`] wraps another backend for dry runs.
//! - [`MockShare`] keeps everything in memory for tests (feature `mock`).

#[cfg(feature = "mock")]
mod mock;
mod mounted;
mod ro;
#[cfg(feature = "smbclient")]
mod smbclient;

#[cfg(feature = "mock")]
pub use self::mock::{MockShare, Operation};
pub use self::mounted::MountedShare;
pub use self::ro::ReadOnlyShare;
#[cfg(feature = "smbclient")]
pub use self::smbclient::{Credentials, SmbClientShare};
use crate::ShareEntry;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Unified interface for remote share sessions.
///
/// All paths are relative to the share root and validated with
/// [`validate_path`](crate::validate_path) by implementations. No operation
/// retries internally: a failure is final for the item it concerned, and the
/// caller decides whether the batch carries on.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// # use smbpix_share::{RemoteShare, error::Result};
/// # async fn example(share: &dyn RemoteShare) -> Result<()> {
/// for entry in share.list(Path::new("Conversion")).await? {
///     if !entry.is_directory {
///         share.download(&entry.path, Path::new("/tmp/staged.psd")).await?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RemoteShare: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// List the immediate children of a directory.
    ///
    /// Never returns `.` or `..`. Fails with
    /// [`Unavailable`](crate::error::ErrorKind::Unavailable) if the session
    /// is down or the directory does not exist.
    async fn list(&self, path: &Path) -> Result<Vec<ShareEntry>>;

    /// Copy a remote file to a local path, overwriting the local file.
    ///
    /// Fails with [`Transfer`](crate::error::ErrorKind::Transfer).
    async fn download(&self, path: &Path, local: &Path) -> Result<()>;

    /// Write `data` to a remote path, creating or overwriting the target.
    ///
    /// Fails with [`Transfer`](crate::error::ErrorKind::Transfer).
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use smbpix_share::{RemoteShare, error::Result};
    /// # async fn example(share: &dyn RemoteShare) -> Result<()> {
    /// share.upload(b"\x89PNG...", Path::new("Converted/_foo.png")).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn upload(&self, data: &[u8], path: &Path) -> Result<()>;

    /// Move or rename an entry within the share.
    ///
    /// Never replaces an existing entry. Fails with
    /// [`Rename`](crate::error::ErrorKind::Rename) if the target is invalid,
    /// already exists, or the share rejects the operation.
    async fn rename(&self, entry: &ShareEntry, to: &Path) -> Result<()>;
}
