//! Transform engine: folds adjustment matrices and applies them per pixel.
//!
//! ```text
//!   AdjustmentSet ──→ build() per non-zero entry ──→ fold (then) ──→ ColorMatrix
//!                                                                      │
//!   ImageBuffer ───────────────────────────── per pixel: M × px, clamp ─┴─→ ImageBuffer
//! ```
//!
//! Matrices are concatenated in
//! [`Adjustment::COMPOSITION_ORDER`](crate::Adjustment::COMPOSITION_ORDER); each one
//! acts on the output of everything composed before it.

use std::borrow::Cow;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::adjustment::builder;
use crate::adjustment::AdjustmentSet;
use crate::error::{TransformError, TransformResult};
use crate::image::{ImageBuffer, Pixel};
use crate::matrix::ColorMatrix;

/// Default pixel count at which application switches to the thread pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256 * 256;

/// Rows handed to one worker at a time.
#[cfg(feature = "parallel")]
const ROWS_PER_TASK: usize = 16;

/// Tuning knobs for [`TransformEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Images with at least this many pixels are processed in parallel row
    /// chunks. Ignored without the `parallel` feature.
    pub parallel_threshold: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// A composed, immutable transform ready to be applied to images.
///
/// `matrix` is `None` when every adjustment is zero; application then returns
/// the input untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformEngine {
    matrix: Option<ColorMatrix>,
    options: EngineOptions,
}

impl TransformEngine {
    /// Compose `adjustments` with default options.
    pub fn new(adjustments: &AdjustmentSet) -> Self {
        Self::with_options(adjustments, EngineOptions::default())
    }

    /// Compose `adjustments` with explicit options.
    pub fn with_options(adjustments: &AdjustmentSet, options: EngineOptions) -> Self {
        Self {
            matrix: compose(adjustments),
            options,
        }
    }

    /// The combined matrix, `None` on the identity path.
    pub fn combined_matrix(&self) -> Option<&ColorMatrix> {
        self.matrix.as_ref()
    }

    /// Whether application is a no-op.
    pub fn is_identity(&self) -> bool {
        self.matrix.is_none()
    }

    /// Transform a single pixel.
    pub fn apply_pixel(&self, pixel: Pixel) -> Pixel {
        match &self.matrix {
            Some(m) => m.apply(pixel),
            None => pixel,
        }
    }

    /// Transform `image` into a new buffer of the same dimensions.
    ///
    /// On the identity path the input is returned borrowed, with no
    /// allocation. Fails only when the output buffer cannot be allocated.
    pub fn apply<'a>(&self, image: &'a ImageBuffer) -> TransformResult<Cow<'a, ImageBuffer>> {
        let Some(matrix) = self.matrix else {
            tracing::debug!("identity transform, returning input unchanged");
            return Ok(Cow::Borrowed(image));
        };

        let count = image.pixels.len();
        let mut pixels: Vec<Pixel> = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| TransformError::ResourceExhausted { pixels: count })?;

        if self.runs_parallel(count) {
            apply_rows_parallel(&matrix, image, &mut pixels);
        } else {
            pixels.extend(image.pixels.iter().map(|px| matrix.apply(*px)));
        }

        tracing::debug!(
            "applied color matrix to {}x{} image ({count} pixels)",
            image.width,
            image.height
        );

        Ok(Cow::Owned(ImageBuffer {
            width: image.width,
            height: image.height,
            pixels,
        }))
    }

    /// Transform `image` in place.
    pub fn apply_in_place(&self, image: &mut ImageBuffer) {
        let Some(matrix) = self.matrix else {
            return;
        };

        #[cfg(feature = "parallel")]
        if self.runs_parallel(image.pixels.len()) {
            image
                .pixels
                .par_iter_mut()
                .for_each(|px| *px = matrix.apply(*px));
            return;
        }

        for px in &mut image.pixels {
            *px = matrix.apply(*px);
        }
    }

    fn runs_parallel(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && count > 0 && count >= self.options.parallel_threshold
    }
}

/// Fold the non-zero adjustments of `adjustments` into one matrix.
///
/// Returns `None` when nothing is active.
pub fn compose(adjustments: &AdjustmentSet) -> Option<ColorMatrix> {
    let combined = adjustments
        .active()
        .filter_map(|(adj, v)| {
            tracing::debug!("composing {adj} = {v}");
            builder::build(adj, v)
        })
        .reduce(|acc, next| acc.then(&next));

    if combined.is_none() {
        tracing::debug!("no active adjustments");
    }
    combined
}

/// Compose and apply in one call.
pub fn apply<'a>(
    image: &'a ImageBuffer,
    adjustments: &AdjustmentSet,
) -> TransformResult<Cow<'a, ImageBuffer>> {
    TransformEngine::new(adjustments).apply(image)
}

/// Fill `out` from `image` using disjoint row chunks on the rayon pool.
#[cfg(feature = "parallel")]
fn apply_rows_parallel(matrix: &ColorMatrix, image: &ImageBuffer, out: &mut Vec<Pixel>) {
    let chunk = (image.width as usize).max(1) * ROWS_PER_TASK;
    out.resize(image.pixels.len(), [0; 4]);
    out.par_chunks_mut(chunk)
        .zip(image.pixels.par_chunks(chunk))
        .for_each(|(dst, src)| {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = matrix.apply(*s);
            }
        });
}

#[cfg(not(feature = "parallel"))]
fn apply_rows_parallel(matrix: &ColorMatrix, image: &ImageBuffer, out: &mut Vec<Pixel>) {
    out.extend(image.pixels.iter().map(|px| matrix.apply(*px)));
}
