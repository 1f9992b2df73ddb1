//! Share Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. The variants mirror what a caller can
//! do about a failed share operation: give up on the batch (`Unavailable`) or
//! give up on a single entry (`Transfer`, `Rename`).

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A share error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for share operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Directory could not be listed: the session is down or the path does
    /// not exist.
    #[display("share unavailable: {}", _0.display())]
    Unavailable(#[error(not(source))] PathBuf),
    /// Whole-file download or upload failed (read failure, permission denial,
    /// disconnect).
    #[display("transfer failed: {}", _0.display())]
    Transfer(#[error(not(source))] PathBuf),
    /// The share rejected a rename/move, or the target path is invalid.
    #[display("rename rejected: {}", _0.display())]
    Rename(#[error(not(source))] PathBuf),
    /// Path contains invalid characters or escapes the share root
    #[display("invalid path: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// The `smbclient` executable could not be located.
    #[display("smbclient not detected on your system")]
    ClientNotFound,
    /// Status text reported by the backend (e.g. `NT_STATUS_ACCESS_DENIED`).
    #[display("backend error: {_0}")]
    Backend(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Transfer(_) | Self::Backend(_) | Self::Io(_))
    }
}
