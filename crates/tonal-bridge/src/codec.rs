//! Image decode/encode at the edge of the pipeline.
//!
//! Supports common formats via the `image` crate (PNG, JPEG, WebP, BMP, GIF,
//! TIFF). Every image is converted to RGBA8 on the way in; output is always
//! PNG.

use std::io::Cursor;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageReader, Limits};
use tonal_core::{ImageBuffer, TransformError};

/// Decode encoded image bytes into an RGBA8 [`ImageBuffer`] under the
/// `image` crate's default limits.
pub fn decode(bytes: &[u8]) -> Result<ImageBuffer, CodecError> {
    decode_with_limits(bytes, Limits::default())
}

/// Decode with explicit decoder limits. Exceeding them is reported as
/// [`CodecError::TooLarge`].
pub fn decode_with_limits(bytes: &[u8], limits: Limits) -> Result<ImageBuffer, CodecError> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.limits(limits);
    let img = reader.decode().map_err(CodecError::from_decode)?;
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    tracing::debug!("decoded {width}x{height} image from {} bytes", bytes.len());
    Ok(ImageBuffer::from_rgba_bytes(width, height, rgba.as_raw())?)
}

/// Encode an [`ImageBuffer`] as lossless PNG.
pub fn encode_png(image: &ImageBuffer) -> Result<Vec<u8>, CodecError> {
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out)
        .write_image(
            image.as_bytes(),
            image.width,
            image.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(CodecError::Encode)?;
    Ok(out.into_inner())
}

/// Load and decode an image file.
pub fn load_file(path: &Path, limits: Limits) -> Result<ImageBuffer, CodecError> {
    let bytes = std::fs::read(path)?;
    decode_with_limits(&bytes, limits)
}

/// Encode `image` as PNG and write it to `path`.
pub fn save_png(image: &ImageBuffer, path: &Path) -> Result<(), CodecError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Errors that can occur while decoding or encoding images.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to decode image: {0}")]
    Decode(ImageError),
    #[error("image exceeds decoder memory limits: {0}")]
    TooLarge(ImageError),
    #[error("failed to encode image: {0}")]
    Encode(ImageError),
    #[error("decoded pixels do not form an RGBA image: {0}")]
    Layout(#[from] TransformError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    fn from_decode(err: ImageError) -> Self {
        match err {
            ImageError::Limits(_) => Self::TooLarge(err),
            other => Self::Decode(other),
        }
    }
}
