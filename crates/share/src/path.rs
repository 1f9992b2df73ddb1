//! Share path validation.
//!
//! Every path handed to a backend is relative to the share root. Validation
//! normalizes it and rejects anything that would leave the root.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates and normalizes a share path.
///
/// `.` components and repeated or trailing separators are dropped, `..` is
/// resolved as long as it stays inside the root. Null bytes, Windows prefixes
/// and paths that normalize to nothing are rejected with
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath).
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use smbpix_share::validate_path;
///
/// assert_eq!(validate_path("Conversion//input_a.psd").unwrap(), Path::new("Conversion/input_a.psd"));
/// assert!(validate_path("../Converted").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let invalid = || exn::Exn::from(ErrorKind::InvalidPath(original.to_path_buf()));
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(s) if s.as_encoded_bytes().contains(&0) => return Err(invalid()),
            Component::Normal(s) => components.push(s),
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => return Err(invalid()),
            Component::ParentDir => {
                if components.pop().is_none() {
                    return Err(invalid());
                }
            },
        }
    }
    if components.is_empty() {
        return Err(invalid());
    }
    Ok(components.into_iter().collect())
}
