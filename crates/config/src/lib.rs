//! Layered configuration for smbpix.
//!
//! Sources are merged in order, later ones winning:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A configuration file: the explicit path if one is given, otherwise
//!    `smbpix.toml` in the platform configuration directory when it exists.
//!    TOML, YAML and JSON are chosen by file extension.
//! 3. Environment variables prefixed with `SMBPIX_`, with `__` separating
//!    nested keys (`SMBPIX_SHARE__PASSWORD`).

pub mod error;
mod load;

pub use crate::load::{default_path, load};

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const REDACTED: &str = "********";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "smbpix")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub share: ShareConfig,
    pub staging: StagingConfig,
    pub convert: ConvertConfig,
    pub rename: RenameConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareBackend {
    /// Drive the `smbclient` executable.
    #[default]
    SmbClient,
    /// Use a share already mounted into the local filesystem.
    Mounted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareConfig {
    pub backend: ShareBackend,
    pub host: String,
    pub share: String,
    pub domain: Option<String>,
    pub user: String,
    pub password: Option<String>,
    /// Mount point, for the `mounted` backend.
    pub mount: Option<PathBuf>,
    /// Explicit `smbclient` executable instead of searching `PATH`.
    pub smbclient: Option<PathBuf>,
}

/// Local staging roots, one per pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingConfig {
    pub conversion: PathBuf,
    pub renaming: PathBuf,
}
impl Default for StagingConfig {
    fn default() -> Self {
        let base = project_dirs()
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("smbpix"));
        Self {
            conversion: base.join("conversions"),
            renaming: base.join("renaming"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Case-insensitive name substrings that are never converted.
    pub skip: Vec<String>,
    pub format: String,
    pub quality: i64,
    /// Always encode at quality 100, ignoring `quality`.
    pub force_max_quality: bool,
}
impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            source: "Conversion".into(),
            destination: "Converted".into(),
            skip: vec!["insitu".to_string()],
            format: "png".to_string(),
            quality: 100,
            force_max_quality: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameConfig {
    pub root: PathBuf,
    /// Case-insensitive name substrings that are neither renamed nor walked.
    pub exclusions: Vec<String>,
    /// `parent` or `top-two`.
    pub destination: String,
    /// Leave names that already end in `_<w>x<h>` for their own size alone.
    pub skip_already_named: bool,
}
impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            root: "to_be_renamed".into(),
            exclusions: vec!["original".to_string(), "thumbs".to_string()],
            destination: "parent".to_string(),
            skip_already_named: false,
        }
    }
}

impl Config {
    /// Check the settings the share backend needs.
    ///
    /// Pipeline settings (format, quality, destination mode) are validated
    /// when the pipelines are built from them.
    pub fn validate(&self) -> Result<()> {
        let share = &self.share;
        match share.backend {
            ShareBackend::SmbClient => {
                for (key, value) in [("share.host", &share.host), ("share.share", &share.share), ("share.user", &share.user)] {
                    if value.trim().is_empty() {
                        exn::bail!(ErrorKind::Invalid(format!("{key} is required for the smbclient backend")));
                    }
                }
            },
            ShareBackend::Mounted => match &share.mount {
                Some(mount) if mount.is_absolute() => {},
                Some(mount) => exn::bail!(ErrorKind::Invalid(format!("share.mount {} is not absolute", mount.display()))),
                None => exn::bail!(ErrorKind::Invalid("share.mount is required for the mounted backend".to_string())),
            },
        }
        if self.staging.conversion.as_os_str().is_empty() || self.staging.renaming.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("staging directories must not be empty".to_string()));
        }
        Ok(())
    }

    /// A copy safe to print: the share password is masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.share.password.is_some() {
            config.share.password = Some(REDACTED.to_string());
        }
        config
    }
}
