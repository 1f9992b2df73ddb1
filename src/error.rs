//! Driver Error Types
//!
//! Errors from the library crates are attached as children of one of these
//! kinds, so the printed error tree reads top-down from what the driver was
//! doing to what actually went wrong.

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not open the remote share")]
    Share,
    #[display("could not prepare staging directory {}", _0.display())]
    Staging(#[error(not(source))] PathBuf),
    #[display("invalid batch settings")]
    Settings,
    #[display("could not read confirmation")]
    Prompt,
    /// The batch stopped before it got through its entries.
    #[display("{_0} aborted")]
    Aborted(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Share | Self::Aborted(_))
    }
}
