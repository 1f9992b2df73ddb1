//! Production image codec built on the `image` and `psd` crates.

use crate::error::{Error, ErrorKind, Result};
use crate::{ImageHandle, ImageInspector, OutputFormat, Quality, SourceKind};
use exn::ResultExt;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Frame, ImageFormat, RgbaImage};
use psd::Psd;
use std::io::Cursor;
use std::path::Path;
use tracing::instrument;

// GIF quantizer speed range accepted by the encoder (1 = best, 30 = fastest).
const GIF_BEST_SPEED: u8 = 1;
const GIF_FASTEST_SPEED: u8 = 30;
// Fixed-size file header every Photoshop document starts with.
const PSD_HEADER_LEN: usize = 26;

/// [`ImageInspector`] backed by the `image` crate, with Photoshop documents
/// flattened through the `psd` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardInspector;

impl StandardInspector {
    fn decode_psd(bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.len() < PSD_HEADER_LEN {
            exn::bail!(ErrorKind::Decode);
        }
        let psd = Psd::from_bytes(bytes).or_raise(|| ErrorKind::Decode)?;
        let composite = RgbaImage::from_raw(psd.width(), psd.height(), psd.rgba())
            .ok_or_else(|| Error::from(ErrorKind::Decode))?;
        Ok(DynamicImage::ImageRgba8(composite))
    }
}

impl ImageInspector for StandardInspector {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn decode(&self, path: &Path) -> Result<ImageHandle> {
        let bytes = std::fs::read(path).or_raise(|| ErrorKind::Io)?;
        let source = SourceKind::detect(path, &bytes);
        let image = match source {
            SourceKind::Psd => Self::decode_psd(&bytes)?,
            SourceKind::Raster => image::load_from_memory(&bytes).or_raise(|| ErrorKind::Decode)?,
        };
        tracing::debug!(?source, width = image.width(), height = image.height(), "Decoded image");
        Ok(ImageHandle::new(image, source))
    }

    #[instrument(skip_all, fields(%format, %quality, size = tracing::field::Empty))]
    fn encode(&self, image: &ImageHandle, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
        let image = image.image();
        let mut buffer = Cursor::new(Vec::new());
        let encoded = match format {
            OutputFormat::Jpg => {
                // The JPEG encoder rejects a quality factor of zero and has no alpha channel.
                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.get().max(1));
                DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
            },
            OutputFormat::Png => image.write_to(&mut buffer, ImageFormat::Png),
            OutputFormat::Gif => {
                let mut encoder = GifEncoder::new_with_speed(&mut buffer, gif_speed(quality).into());
                encoder.encode_frame(Frame::new(image.to_rgba8()))
            },
            OutputFormat::Tif => DynamicImage::ImageRgba8(image.to_rgba8()).write_to(&mut buffer, ImageFormat::Tiff),
        };
        encoded.or_raise(|| ErrorKind::Encode(format.to_string()))?;
        let bytes = buffer.into_inner();
        tracing::Span::current().record("size", bytes.len());
        Ok(bytes)
    }
}

/// Higher quality spends more time in the GIF quantizer.
fn gif_speed(quality: Quality) -> u8 {
    let range = u16::from(GIF_FASTEST_SPEED - GIF_BEST_SPEED);
    let saved = u16::from(quality.get()) * range / 100;
    GIF_FASTEST_SPEED - saved as u8
}
