//! Error types for the [`rename`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.
//! Every variant concerns a single entry; none of them stops the walk.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A rename error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for rename operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A directory below the root could not be listed; its subtree is skipped.
    #[display("could not list {}", _0.display())]
    Listing(#[error(not(source))] PathBuf),
    /// Downloading the file to staging failed.
    #[display("transfer failed: {}", _0.display())]
    Transfer(#[error(not(source))] PathBuf),
    /// The staged file is not a readable image.
    #[display("decode failed")]
    Decode,
    /// The share rejected the rename.
    #[display("rename to {} rejected", _0.display())]
    Rename(#[error(not(source))] PathBuf),
    /// The staging file could not be deleted. Reported as a warning only.
    #[display("could not delete staging file {}", _0.display())]
    Cleanup(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Listing(_) | Self::Transfer(_))
    }
}
