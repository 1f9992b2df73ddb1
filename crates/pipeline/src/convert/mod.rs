//! Flat batch conversion.
//!
//! Every file directly inside the source directory is downloaded to a staging
//! file, decoded, re-encoded in the requested [`OutputFormat`] and uploaded to
//! the destination directory under a name derived by
//! [`conversion_name`](crate::conversion_name). Subdirectories are not
//! descended into.
//!
//! The primary entry point is [`convert`], which lists the source directory
//! and streams a [`Report`](crate::Report) for each entry by passing it to
//! [`convert_entry`].

pub mod error;
mod file;
mod stream;

pub use self::file::{Action, Report, convert_entry};
pub use self::stream::{ConvertEvent, convert};

use crate::error::{ErrorKind as PipelineErrorKind, Result as PipelineResult};
use crate::{Exclusions, Staging};
use exn::ResultExt;
use smbpix_inspect::{InspectorHandle, OutputFormat, Quality};
use smbpix_share::ShareHandle;
use std::path::PathBuf;

/// Validated conversion settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Remote directory whose files are converted.
    pub source: PathBuf,
    /// Remote directory the converted files are uploaded to.
    pub destination: PathBuf,
    /// Entries whose name contains one of these are left alone.
    pub skip: Exclusions,
    pub format: OutputFormat,
    pub quality: Quality,
    /// Encode at maximum quality regardless of [`quality`](Self::quality).
    pub force_max_quality: bool,
}
impl Settings {
    /// Build settings from operator-supplied format and quality text.
    ///
    /// # Errors
    ///
    /// [`InvalidConfiguration`](PipelineErrorKind::InvalidConfiguration) if
    /// the format is unsupported or the quality is not an integer in
    /// `0..=100`.
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        skip: Exclusions,
        format: &str,
        quality: &str,
        force_max_quality: bool,
    ) -> PipelineResult<Self> {
        let format = format
            .parse::<OutputFormat>()
            .or_raise(|| PipelineErrorKind::InvalidConfiguration(format!("unsupported output format {format:?}")))?;
        let quality = quality
            .parse::<Quality>()
            .or_raise(|| PipelineErrorKind::InvalidConfiguration(format!("quality {quality:?} is not in 0..=100")))?;
        Ok(Self {
            source: source.into(),
            destination: destination.into(),
            skip,
            format,
            quality,
            force_max_quality,
        })
    }

    /// Quality actually handed to the encoder.
    pub fn effective_quality(&self) -> Quality {
        if self.force_max_quality { Quality::MAX } else { self.quality }
    }
}

/// Everything a conversion batch needs.
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

    fn settings(format: &str, quality: &str) -> PipelineResult<Settings> {
        Settings::new("Conversion", "Converted", Exclusions::new(["insitu"]), format, quality, false)
    }

    #[test]
    fn test_settings_parse() {
        let settings = settings("JPEG", "85").unwrap();
        assert_eq!(settings.format, OutputFormat::Jpg);
        assert_eq!(settings.effective_quality().get(), 85);
    }

    #[rstest]
    #[case("png", "101")]
    #[case("png", "-5")]
    #[case("png", "best")]
    #[case("webp", "90")]
    fn test_settings_rejected(#[case] format: &str, #[case] quality: &str) {
        let err = settings(format, quality).unwrap_err();
        assert!(matches!(&*err, PipelineErrorKind::InvalidConfiguration(_)));
    }

    #[test]
    fn test_force_max_quality() {
        let mut settings = settings("jpg", "40").unwrap();
        settings.force_max_quality = true;
        assert_eq!(settings.effective_quality(), Quality::MAX);
    }
}
