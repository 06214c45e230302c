//! Per-adjustment color matrices.
//!
//! Every builder takes a signed intensity `v` and returns a [`ColorMatrix`]
//! in 8-bit sample units. Alpha is never touched.
//!
//! | adjustment | linear block (R, G, B)                 | offset (R, G, B)   |
//! |------------|----------------------------------------|--------------------|
//! | brightness | identity                               | `v × 255`          |
//! | contrast   | `1 + v`                                | `128 × (1 − s)`    |
//! | exposure   | `2^v`                                  | 0                  |
//! | saturation | luma-weighted blend, `s = 1 + v`       | 0                  |
//! | warmth     | `(1 + 0.3v, 1, 1 − 0.3v)`              | 0                  |
//! | tint       | `(1 + 0.2v, 1 − 0.2v, 1 + 0.2v)`       | 0                  |

use glam::{Mat4, Vec4};

use super::Adjustment;
use crate::matrix::{ColorMatrix, SAMPLE_MAX};

/// Luminance weights used by the saturation matrix.
///
/// These are the constants of Android's `ColorMatrix.setSaturation`, kept
/// for parity with images produced on that platform.
pub const SATURATION_LUMA: [f32; 3] = [0.213, 0.715, 0.072];

/// Midpoint held fixed by contrast.
pub const CONTRAST_PIVOT: f32 = 128.0;

/// Strength of the warmth red/blue shift per unit intensity.
const WARMTH_STRENGTH: f32 = 0.3;

/// Strength of the tint green/magenta shift per unit intensity.
const TINT_STRENGTH: f32 = 0.2;

/// Largest magnitude of any scale a builder emits. Any non-zero sample
/// times this saturates. Products of six bounded matrices stay finite.
pub const SCALE_LIMIT: f32 = 4096.0;

/// Largest magnitude of any additive offset a builder emits.
const OFFSET_LIMIT: f32 = SCALE_LIMIT * SAMPLE_MAX;

fn bounded_scale(scale: f32) -> f32 {
    scale.clamp(-SCALE_LIMIT, SCALE_LIMIT)
}

/// Matrix for `adjustment` at `intensity`, or `None` when it has no effect.
///
/// A zero intensity yields `None` rather than an identity matrix so the
/// engine never composes it. `NaN` is treated the same way.
pub fn build(adjustment: Adjustment, intensity: f32) -> Option<ColorMatrix> {
    if intensity == 0.0 || intensity.is_nan() {
        return None;
    }
    let matrix = match adjustment {
        Adjustment::Brightness => brightness(intensity),
        Adjustment::Contrast => contrast(intensity),
        Adjustment::Exposure => exposure(intensity),
        Adjustment::Saturation => saturation(intensity),
        Adjustment::Warmth => warmth(intensity),
        Adjustment::Tint => tint(intensity),
    };
    Some(matrix)
}

/// Pure translation of R, G and B by `v × 255`.
pub fn brightness(v: f32) -> ColorMatrix {
    let shift = (v * SAMPLE_MAX).clamp(-OFFSET_LIMIT, OFFSET_LIMIT);
    ColorMatrix::scale_translate_rgb(1.0, shift)
}

/// Scale R, G and B by `1 + v` around [`CONTRAST_PIVOT`].
pub fn contrast(v: f32) -> ColorMatrix {
    let scale = bounded_scale(1.0 + v);
    ColorMatrix::scale_translate_rgb(scale, CONTRAST_PIVOT * (1.0 - scale))
}

/// Scale R, G and B by `2^v`: `+1` doubles, `-1` halves.
pub fn exposure(v: f32) -> ColorMatrix {
    let factor = bounded_scale(v.exp2());
    ColorMatrix::scale_rgb(factor, factor, factor)
}

/// Luminance-preserving saturation with `s = 1 + v`.
///
/// Each RGB row is `(1 − s) × luma + s × unit`, so `s = 0` collapses every
/// channel onto the weighted luminance and `s = 1` is the identity.
pub fn saturation(v: f32) -> ColorMatrix {
    let s = bounded_scale(1.0 + v);
    let inv = 1.0 - s;
    let [lr, lg, lb] = SATURATION_LUMA.map(|w| w * inv);

    // Columns of the linear block.
    let linear = Mat4::from_cols(
        Vec4::new(lr + s, lr, lr, 0.0),
        Vec4::new(lg, lg + s, lg, 0.0),
        Vec4::new(lb, lb, lb + s, 0.0),
        Vec4::W,
    );
    ColorMatrix::new(linear, Vec4::ZERO)
}

/// Positive `v` warms (more red, less blue), negative cools.
pub fn warmth(v: f32) -> ColorMatrix {
    let shift = v * WARMTH_STRENGTH;
    ColorMatrix::scale_rgb(bounded_scale(1.0 + shift), 1.0, bounded_scale(1.0 - shift))
}

/// Positive `v` shifts toward magenta (R and B up, G down), negative toward green.
pub fn tint(v: f32) -> ColorMatrix {
    let shift = v * TINT_STRENGTH;
    let up = bounded_scale(1.0 + shift);
    ColorMatrix::scale_rgb(up, bounded_scale(1.0 - shift), up)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_close(actual: f32, expected: f32, what: &str) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "{what}: {actual:.6} vs {expected:.6}"
        );
    }

    fn assert_alpha_row_identity(m: &ColorMatrix) {
        assert_eq!(m.to_rows()[3], [0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zero_intensity_builds_nothing() {
        for adj in Adjustment::ALL {
            assert!(build(adj, 0.0).is_none(), "{adj} at zero should be skipped");
            assert!(build(adj, -0.0).is_none(), "{adj} at -0 should be skipped");
            assert!(build(adj, 0.5).is_some());
        }
    }

    #[test]
    fn test_alpha_row_untouched() {
        for adj in Adjustment::ALL {
            for v in [-1.0, -0.3, 0.7, 10.0] {
                let m = build(adj, v).unwrap();
                assert_alpha_row_identity(&m);
            }
        }
    }

    #[test]
    fn test_brightness_is_pure_translation() {
        let rows = brightness(0.2).to_rows();
        for (c, row) in rows.iter().take(3).enumerate() {
            for (j, coeff) in row.iter().take(4).enumerate() {
                assert_close(*coeff, if c == j { 1.0 } else { 0.0 }, "linear");
            }
            assert_close(row[4], 51.0, "offset");
        }
    }

    #[test]
    fn test_contrast_offsets_keep_pivot() {
        let rows = contrast(0.5).to_rows();
        for (c, row) in rows.iter().take(3).enumerate() {
            assert_close(row[c], 1.5, "scale");
            assert_close(row[4], -64.0, "translate");
        }
    }

    #[test]
    fn test_exposure_is_power_of_two() {
        assert_close(exposure(1.0).to_rows()[0][0], 2.0, "v=1");
        assert_close(exposure(-1.0).to_rows()[1][1], 0.5, "v=-1");
        assert_close(exposure(2.0).to_rows()[2][2], 4.0, "v=2");
        assert_eq!(exposure(1.0).to_rows()[0][4], 0.0);
    }

    #[test]
    fn test_saturation_minus_one_is_luma_projection() {
        let rows = saturation(-1.0).to_rows();
        for row in rows.iter().take(3) {
            assert_close(row[0], SATURATION_LUMA[0], "r weight");
            assert_close(row[1], SATURATION_LUMA[1], "g weight");
            assert_close(row[2], SATURATION_LUMA[2], "b weight");
        }
    }

    #[test]
    fn test_saturation_preserves_gray() {
        // Rows sum to 1, so neutral inputs stay neutral at any strength.
        for v in [-1.0, -0.5, 0.5, 3.0] {
            let m = saturation(v);
            assert_eq!(m.apply([90, 90, 90, 255]), [90, 90, 90, 255]);
        }
    }

    #[test]
    fn test_huge_intensities_stay_finite() {
        for adj in Adjustment::ALL {
            for v in [200.0, -200.0, 1e37, -1e37, f32::MAX, f32::INFINITY] {
                let m = build(adj, v).unwrap();
                for row in m.to_rows() {
                    assert!(row.iter().all(|c| c.is_finite()), "{adj}={v}: {row:?}");
                }
                assert_alpha_row_identity(&m);
            }
        }
        assert!(build(Adjustment::Exposure, f32::NAN).is_none());
    }

    #[test]
    fn test_huge_contrast_still_keeps_pivot() {
        let m = contrast(1e30);
        assert_eq!(m.apply([128, 128, 128, 255]), [128, 128, 128, 255]);
        assert_eq!(m.apply([129, 127, 0, 255]), [255, 0, 0, 255]);
    }

    #[test]
    fn test_warmth_and_tint_diagonals() {
        let w = warmth(1.0).to_rows();
        assert_close(w[0][0], 1.3, "warm red");
        assert_close(w[1][1], 1.0, "warm green");
        assert_close(w[2][2], 0.7, "warm blue");

        let t = tint(-1.0).to_rows();
        assert_close(t[0][0], 0.8, "tint red");
        assert_close(t[1][1], 1.2, "tint green");
        assert_close(t[2][2], 0.8, "tint blue");
    }
}
