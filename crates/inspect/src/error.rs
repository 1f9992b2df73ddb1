//! Inspect Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An image error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// File is not a readable image. Don't retry with the same input.
    #[display("not a readable image")]
    Decode,
    /// The encoder rejected the image.
    #[display("failed to encode image as {_0}")]
    Encode(#[error(not(source))] String),
    /// The requested output format is not supported.
    #[display("unsupported format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// Quality is non-numeric or outside `0..=100`.
    #[display("invalid quality: {_0}")]
    InvalidQuality(#[error(not(source))] String),
    /// The staged file could not be read.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exn::ResultExt;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Decode.to_string(), "not a readable image");
        assert_eq!(ErrorKind::Encode("jpg".to_string()).to_string(), "failed to encode image as jpg");
        assert_eq!(ErrorKind::InvalidQuality("high".to_string()).to_string(), "invalid quality: high");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(!ErrorKind::Decode.is_retryable());
        assert!(!ErrorKind::UnsupportedFormat("webp".to_string()).is_retryable());
        assert!(ErrorKind::Io.is_retryable());
    }

    #[test]
    fn error_from_result() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"));
        let exn = result.or_raise(|| ErrorKind::Io).unwrap_err();
        assert_eq!(*exn, ErrorKind::Io);
    }
}
