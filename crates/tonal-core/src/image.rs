//! Image representation for the adjustment pipeline.

use crate::error::{TransformError, TransformResult};

/// One RGBA sample, 8 bits per channel.
pub type Pixel = [u8; 4];

/// Decoded RGBA8 raster. Pixels are stored row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, `width * height` entries for a well-formed image.
    pub pixels: Vec<Pixel>,
}

impl ImageBuffer {
    /// Build an image, checking that the pixel count matches the dimensions.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<Pixel>) -> TransformResult<Self> {
        let expected = pixel_count(width, height);
        if expected != Some(pixels.len()) {
            return Err(TransformError::DimensionMismatch {
                width,
                height,
                pixels: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from interleaved RGBA bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> TransformResult<Self> {
        let pixels: &[Pixel] =
            bytemuck::try_cast_slice(bytes).map_err(|_| TransformError::DimensionMismatch {
                width,
                height,
                pixels: bytes.len() / 4,
            })?;
        Self::from_raw(width, height, pixels.to_vec())
    }

    /// A `width x height` image filled with one color.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let len = pixel_count(width, height).unwrap_or(0);
        Self {
            width,
            height,
            pixels: vec![pixel; len],
        }
    }

    /// Interleaved RGBA bytes, borrowed.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of stored pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels.get(idx).copied()
    }
}

fn pixel_count(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)
}
