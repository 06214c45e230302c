//! 4x5 affine color matrix.
//!
//! A [`ColorMatrix`] maps the homogeneous input vector `(R, G, B, A, 1)` to an
//! output `(R, G, B, A)`:
//!
//! ```text
//! | R' |   | m00 m01 m02 m03 m04 |   | R |
//! | G' |   | m10 m11 m12 m13 m14 |   | G |
//! | B' | = | m20 m21 m22 m23 m24 | × | B |
//! | A' |   | m30 m31 m32 m33 m34 |   | A |
//!                                    | 1 |
//! ```
//!
//! The left 4x4 block is stored as a [`Mat4`] and the fifth column as a
//! [`Vec4`] of additive offsets, applied after the linear block. Offsets are
//! expressed in 8-bit sample units (0–255).

use glam::{Mat4, Vec4};

use crate::image::Pixel;

/// Largest representable sample value.
pub const SAMPLE_MAX: f32 = 255.0;

/// Affine color transform: linear 4x4 block plus an offset column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    linear: Mat4,
    offset: Vec4,
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorMatrix {
    /// Unit linear block, zero offsets.
    pub const IDENTITY: Self = Self {
        linear: Mat4::IDENTITY,
        offset: Vec4::ZERO,
    };

    /// Build from a linear block and an offset column.
    pub const fn new(linear: Mat4, offset: Vec4) -> Self {
        Self { linear, offset }
    }

    /// Build from four rows of five coefficients (R, G, B, A, offset).
    pub fn from_rows(rows: [[f32; 5]; 4]) -> Self {
        let row = |r: [f32; 5]| Vec4::new(r[0], r[1], r[2], r[3]);
        let linear = Mat4::from_cols(row(rows[0]), row(rows[1]), row(rows[2]), row(rows[3]))
            .transpose();
        let offset = Vec4::new(rows[0][4], rows[1][4], rows[2][4], rows[3][4]);
        Self { linear, offset }
    }

    /// Row-major coefficients, the inverse of [`from_rows`](Self::from_rows).
    pub fn to_rows(&self) -> [[f32; 5]; 4] {
        let mut rows = [[0.0_f32; 5]; 4];
        for (i, out) in rows.iter_mut().enumerate() {
            let r = self.linear.row(i);
            *out = [r.x, r.y, r.z, r.w, self.offset[i]];
        }
        rows
    }

    /// Independent scale factors on the R, G and B diagonal.
    pub fn scale_rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            linear: Mat4::from_diagonal(Vec4::new(r, g, b, 1.0)),
            offset: Vec4::ZERO,
        }
    }

    /// Scale R, G and B by `scale`, then add `translate` to each of them.
    pub fn scale_translate_rgb(scale: f32, translate: f32) -> Self {
        Self {
            linear: Mat4::from_diagonal(Vec4::new(scale, scale, scale, 1.0)),
            offset: Vec4::new(translate, translate, translate, 0.0),
        }
    }

    /// The linear 4x4 block.
    pub fn linear(&self) -> Mat4 {
        self.linear
    }

    /// The additive offset column.
    pub fn offset(&self) -> Vec4 {
        self.offset
    }

    /// Whether this matrix is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Post-concatenate `next`: the result applies `self` first, then `next`.
    ///
    /// ```text
    /// result = next ∘ self
    /// linear = next.linear × self.linear
    /// offset = next.linear × self.offset + next.offset
    /// ```
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            linear: next.linear * self.linear,
            offset: next.linear * self.offset + next.offset,
        }
    }

    /// Evaluate the matrix on unclamped floating-point samples.
    pub fn transform(&self, rgba: Vec4) -> Vec4 {
        self.linear * rgba + self.offset
    }

    /// Evaluate the matrix on one pixel, clamping and rounding to 8 bits.
    pub fn apply(&self, pixel: Pixel) -> Pixel {
        let input = Vec4::new(
            f32::from(pixel[0]),
            f32::from(pixel[1]),
            f32::from(pixel[2]),
            f32::from(pixel[3]),
        );
        let out = self
            .transform(input)
            .clamp(Vec4::ZERO, Vec4::splat(SAMPLE_MAX))
            .round();
        [out.x as u8, out.y as u8, out.z as u8, out.w as u8]
    }
}
