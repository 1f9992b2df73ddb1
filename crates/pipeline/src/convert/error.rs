//! Error types for the [`convert`](super) module.
//!
//! Uses [`exn`] for automatic location tracking and error tree construction.
//! Every variant concerns a single entry; none of them stops the batch.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A conversion error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies the step of the per-entry sequence that failed.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Downloading the source or uploading the result failed.
    #[display("transfer failed: {}", _0.display())]
    Transfer(#[error(not(source))] PathBuf),
    /// The staged file is not a readable image.
    #[display("decode failed")]
    Decode,
    /// The image could not be encoded in the requested format.
    #[display("encode failed")]
    Encode,
    /// The staging file could not be deleted. Reported as a warning only.
    #[display("could not delete staging file {}", _0.display())]
    Cleanup(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transfer(_))
    }
}
