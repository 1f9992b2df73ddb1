//! Deterministic inspector for testing.

use crate::error::{Error, ErrorKind, Result};
use crate::{ImageHandle, ImageInspector, OutputFormat, Quality, SourceKind};
use exn::ResultExt;
use image::{DynamicImage, RgbImage};
use std::collections::HashSet;
use std::path::Path;

/// Inspector that reads images from a plain-text `<width>x<height>` payload.
///
/// A staged file containing `800x600` decodes to a blank 800×600 image; any
/// other content is a decode failure. Encoding produces
/// `<format>:<quality>:<width>x<height>` so tests can assert what was
/// published.
///
/// # Examples
///
/// ```
/// use smbpix_inspect::{ImageInspector, MockInspector, OutputFormat, Quality};
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("photo.psd");
/// std::fs::write(&path, "40x30").unwrap();
///
/// let inspector = MockInspector::default();
/// let image = inspector.decode(&path).unwrap();
/// assert_eq!(inspector.dimensions(&image), (40, 30));
/// let bytes = inspector.encode(&image, OutputFormat::Png, Quality::MAX).unwrap();
/// assert_eq!(bytes, b"png:100:40x30");
/// ```
#[derive(Debug, Default)]
pub struct MockInspector {
    failing_formats: HashSet<OutputFormat>,
}

impl MockInspector {
    /// Make every encode into `format` fail.
    pub fn failing_encode(mut self, format: OutputFormat) -> Self {
        self.failing_formats.insert(format);
        self
    }

    fn parse(payload: &str) -> Option<(u32, u32)> {
        let (width, height) = payload.trim().split_once('x')?;
        Some((width.parse().ok()?, height.parse().ok()?))
    }
}

impl ImageInspector for MockInspector {
    fn decode(&self, path: &Path) -> Result<ImageHandle> {
        let payload = std::fs::read_to_string(path).or_raise(|| ErrorKind::Decode)?;
        let (width, height) = Self::parse(&payload).ok_or_else(|| Error::from(ErrorKind::Decode))?;
        let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
        Ok(ImageHandle::new(image, SourceKind::from_path(path)))
    }

    fn encode(&self, image: &ImageHandle, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
        if self.failing_formats.contains(&format) {
            exn::bail!(ErrorKind::Encode(format.to_string()));
        }
        let (width, height) = self.dimensions(image);
        Ok(format!("{format}:{quality}:{width}x{height}").into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("800x600", Some((800, 600)))]
    #[case(" 1x1\n", Some((1, 1)))]
    #[case("800*600", None)]
    #[case("x600", None)]
    #[case("", None)]
    fn test_parse(#[case] payload: &str, #[case] expected: Option<(u32, u32)>) {
        assert_eq!(MockInspector::parse(payload), expected);
    }

    #[test]
    fn test_failing_encode() {
        let inspector = MockInspector::default().failing_encode(OutputFormat::Gif);
        let image = ImageHandle::new(DynamicImage::ImageRgb8(RgbImage::new(2, 2)), SourceKind::Raster);
        let err = inspector.encode(&image, OutputFormat::Gif, Quality::MAX).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Encode(_)));
        assert!(inspector.encode(&image, OutputFormat::Jpg, Quality::MAX).is_ok());
    }
}
