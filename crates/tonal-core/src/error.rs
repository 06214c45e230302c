//! Error types for the transform core.

/// Errors surfaced by image construction and transform application.
///
/// Out-of-range intensities and unknown adjustment names are never errors:
/// the former are honored and clamped at the sample level, the latter are
/// dropped when the [`AdjustmentSet`](crate::AdjustmentSet) is built.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The output buffer could not be allocated.
    ///
    /// Reported separately from other failures so callers can retry on a
    /// downscaled image.
    #[error("not enough memory to allocate {pixels} output pixels")]
    ResourceExhausted {
        /// Number of pixels the engine tried to allocate.
        pixels: usize,
    },

    /// The pixel vector does not match the declared dimensions.
    #[error("expected {width}x{height} pixels, got {pixels}")]
    DimensionMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Actual pixel count.
        pixels: usize,
    },
}

/// Result alias for fallible core operations.
pub type TransformResult<T> = Result<T, TransformError>;
