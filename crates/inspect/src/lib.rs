//! Image decoding, re-encoding and dimension inspection.
//!
//! This crate puts the image work both batch pipelines need behind the
//! [`ImageInspector`] trait:
//!
//! - **Decode** a staged local file into an [`ImageHandle`]. Photoshop
//!   documents are flattened to their composite through the `psd` crate;
//!   everything else goes through the `image` crate's format sniffing.
//! - **Encode** a handle into one of the [`OutputFormat`]s at a validated
//!   [`Quality`].
//! - Read **dimensions** from a handle.
//!
//! [`StandardInspector`] is the production implementation. A deterministic
//! `MockInspector` is available behind the `mock` feature.

mod codec;
pub mod error;
mod format;
#[cfg(feature = "mock")]
mod mock;
mod quality;

pub use crate::codec::StandardInspector;
pub use crate::format::{OutputFormat, SourceKind};
#[cfg(feature = "mock")]
pub use crate::mock::MockInspector;
pub use crate::quality::Quality;

use crate::error::Result;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;

/// A decoded image, detached from the file it was read from.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    image: DynamicImage,
    source: SourceKind,
}
impl ImageHandle {
    pub fn new(image: DynamicImage, source: SourceKind) -> Self {
        Self { image, source }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// How the image was decoded.
    pub fn source(&self) -> SourceKind {
        self.source
    }
}

/// Image operations used by the batch pipelines.
///
/// Implementations are synchronous and CPU-bound; async callers are expected
/// to run them on a blocking thread.
pub trait ImageInspector: Send + Sync {
    /// Decode a local file.
    ///
    /// Fails with [`Decode`](crate::error::ErrorKind::Decode) if the file is
    /// not a readable image.
    fn decode(&self, path: &Path) -> Result<ImageHandle>;

    /// Re-encode an image.
    ///
    /// Fails with [`Encode`](crate::error::ErrorKind::Encode).
    fn encode(&self, image: &ImageHandle, format: OutputFormat, quality: Quality) -> Result<Vec<u8>>;

    /// Pixel `(width, height)` of a decoded image.
    fn dimensions(&self, image: &ImageHandle) -> (u32, u32) {
        (image.image.width(), image.image.height())
    }
}

pub type InspectorHandle = Arc<dyn ImageInspector + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_default_dimensions() {
        let handle = ImageHandle::new(DynamicImage::ImageRgb8(RgbImage::new(800, 600)), SourceKind::Raster);
        assert_eq!(StandardInspector.dimensions(&handle), (800, 600));
        assert_eq!(handle.source(), SourceKind::Raster);
    }
}
