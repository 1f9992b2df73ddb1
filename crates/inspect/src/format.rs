use crate::error::{Error, ErrorKind};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const PSD_MAGIC: [u8; 4] = *b"8BPS";

/// Output format of a conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpg,
    #[default]
    Png,
    Gif,
    Tif,
}
impl OutputFormat {
    /// File extension written for this format, without the dot.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Tif => "tif",
        }
    }
}
impl FromStr for OutputFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "tif" | "tiff" => Ok(Self::Tif),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(s.to_string())),
        }
    }
}
impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Decoder family a staged file is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Photoshop document, flattened to its composite.
    Psd,
    /// Anything the `image` crate can sniff.
    Raster,
}
impl SourceKind {
    /// Detect from magic bytes, falling back to the file extension.
    ///
    /// Too few bytes never rules out a PSD named as one.
    #[must_use]
    pub fn detect(path: impl AsRef<Path>, header: &[u8]) -> Self {
        if header.starts_with(&PSD_MAGIC) {
            return Self::Psd;
        }
        if header.len() < PSD_MAGIC.len() && Self::from_path(path) == Self::Psd {
            return Self::Psd;
        }
        Self::Raster
    }

    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext.to_lowercase().as_str() {
                "psd" | "psb" => Self::Psd,
                _ => Self::Raster,
            })
            .unwrap_or(Self::Raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("jpg", OutputFormat::Jpg)]
    #[case("JPEG", OutputFormat::Jpg)]
    #[case("png", OutputFormat::Png)]
    #[case("Gif", OutputFormat::Gif)]
    #[case("tif", OutputFormat::Tif)]
    #[case("TIFF", OutputFormat::Tif)]
    fn test_from_str(#[case] test: &str, #[case] expected: OutputFormat) {
        assert_eq!(test.parse::<OutputFormat>().unwrap(), expected);
    }

    #[rstest]
    #[case("webp")]
    #[case("psd")]
    #[case("")]
    fn test_from_str_invalid(#[case] test: &str) {
        let err = test.parse::<OutputFormat>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_display_is_extension() {
        assert_eq!(OutputFormat::Jpg.to_string(), "jpg");
        assert_eq!(OutputFormat::Tif.to_string(), "tif");
    }

    #[rstest]
    #[case("poster.psd", b"8BPS\x00\x01", SourceKind::Psd)]
    #[case("poster.png", b"8BPS\x00\x01", SourceKind::Psd)]
    #[case("poster.psd", b"\x89PNG\r\n\x1a\n", SourceKind::Raster)]
    #[case("poster.PSD", b"", SourceKind::Psd)]
    #[case("poster", b"", SourceKind::Raster)]
    #[case(".psd", b"", SourceKind::Raster)]
    fn test_detect(#[case] path: &str, #[case] header: &[u8], #[case] expected: SourceKind) {
        assert_eq!(SourceKind::detect(path, header), expected);
    }
}
