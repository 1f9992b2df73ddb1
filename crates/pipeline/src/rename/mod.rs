//! Recursive dimension renaming.
//!
//! Walks a directory tree depth-first and renames every image file to carry
//! its pixel dimensions (see [`dimension_name`](crate::dimension_name)).
//! Entries whose name matches an exclusion are neither touched nor descended
//! into.
//!
//! The primary entry point is [`rename`], which streams a
//! [`Report`](crate::Report) for every visited entry by passing each file to
//! [`rename_entry`].

pub mod error;
mod file;
mod stream;

pub use self::file::{Action, Report, destination_dir, rename_entry};
pub use self::stream::{RenameEvent, rename};

use crate::error::{Error as PipelineError, ErrorKind as PipelineErrorKind};
use crate::{Exclusions, Staging};
use smbpix_inspect::InspectorHandle;
use smbpix_share::ShareHandle;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Directory a renamed file is moved into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Destination {
    /// Stay in the directory the file was found in.
    #[default]
    Parent,
    /// Move into the directory named by the first two components of the
    /// file's path, flattening anything deeper. Files less than three
    /// components deep stay in their parent.
    TopTwo,
}
impl FromStr for Destination {
    type Err = PipelineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parent" => Ok(Self::Parent),
            "top-two" | "top_two" => Ok(Self::TopTwo),
            _ => exn::bail!(PipelineErrorKind::InvalidConfiguration(format!(
                "unknown rename destination {s:?}, expected \"parent\" or \"top-two\""
            ))),
        }
    }
}
impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("parent"),
            Self::TopTwo => f.write_str("top-two"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// Remote directory the walk starts from.
    pub root: PathBuf,
    pub exclusions: Exclusions,
    pub destination: Destination,
    /// Leave files alone whose name already ends in their own dimensions,
    /// instead of appending them a second time.
    pub skip_already_named: bool,
}

/// Everything a rename walk needs.
#[derive(Clone)]
pub struct Context {
    pub share: ShareHandle,
    pub inspector: InspectorHandle,
    pub staging: Staging,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("parent", Destination::Parent)]
    #[case("Top-Two", Destination::TopTwo)]
    #[case("top_two", Destination::TopTwo)]
    fn test_destination_from_str(#[case] test: &str, #[case] expected: Destination) {
        assert_eq!(test.parse::<Destination>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<Destination>().unwrap(), expected);
    }

    #[test]
    fn test_destination_from_str_invalid() {
        let err = "grandparent".parse::<Destination>().unwrap_err();
        assert!(matches!(&*err, PipelineErrorKind::InvalidConfiguration(_)));
    }
}
