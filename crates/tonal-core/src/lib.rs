//! Tonal Core — color-matrix engine for photographic adjustments.
//!
//! This crate builds affine color matrices for brightness, contrast,
//! exposure, saturation, warmth and tint, folds them into one transform, and
//! applies it to RGBA8 buffers. No codec or transport dependencies.

pub mod adjustment;
pub mod engine;
pub mod error;
pub mod image;
pub mod matrix;

// Re-exports for convenience.
pub use adjustment::{Adjustment, AdjustmentSet, UnsupportedAdjustment, coerce_intensity};
pub use engine::{EngineOptions, TransformEngine, apply, compose};
pub use error::{TransformError, TransformResult};
pub use image::{ImageBuffer, Pixel};
pub use matrix::ColorMatrix;
