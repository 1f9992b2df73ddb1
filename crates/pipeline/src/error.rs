//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Only failures that stop a batch
//! before or as it starts are represented here; per-entry failures live in the
//! [`convert`](crate::convert::error) and [`rename`](crate::rename::error)
//! modules.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Settings failed validation; nothing was touched.
    #[display("invalid configuration: {_0}")]
    InvalidConfiguration(#[error(not(source))] String),
    /// The batch's starting directory could not be listed.
    #[display("share unavailable: {}", _0.display())]
    ShareUnavailable(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ShareUnavailable(_))
    }
}
