//! End-to-end behavior of the adjustment engine on small synthetic images.

use serde_json::{Map, Value, json};
use tonal_core::{Adjustment, AdjustmentSet, EngineOptions, ImageBuffer, TransformEngine, apply};

/// A `width x height` image with every channel varying across the frame.
fn create_test_gradient(width: u32, height: u32) -> ImageBuffer {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / (width - 1).max(1)) as u8;
            let g = (y * 255 / (height - 1).max(1)) as u8;
            let b = ((x + y) * 7 % 256) as u8;
            let a = (255 - (x * 3 % 256)) as u8;
            pixels.push([r, g, b, a]);
        }
    }
    ImageBuffer::from_raw(width, height, pixels).unwrap()
}

fn single(pixel: [u8; 4], set: AdjustmentSet) -> [u8; 4] {
    let image = ImageBuffer::filled(1, 1, pixel);
    apply(&image, &set).unwrap().pixels[0]
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => panic!("expected a JSON object"),
    }
}

#[test]
fn test_all_zero_is_byte_identical() {
    let image = create_test_gradient(9, 5);
    let set = AdjustmentSet::from_json_map(&object(json!({
        "exposure": 0, "brightness": 0.0, "contrast": "0",
        "saturation": 0, "warmth": 0, "tint": "0.0",
    })));
    let out = apply(&image, &set).unwrap();
    assert_eq!(out.as_bytes(), image.as_bytes());
}

#[test]
fn test_missing_key_equals_zero_value() {
    let image = create_test_gradient(8, 8);
    let omitted = AdjustmentSet::from_json_map(&object(json!({ "contrast": 0.3 })));
    let explicit = AdjustmentSet::from_json_map(&object(json!({
        "contrast": 0.3, "brightness": 0, "tint": 0,
    })));
    assert_eq!(
        apply(&image, &omitted).unwrap().pixels,
        apply(&image, &explicit).unwrap().pixels
    );
}

#[test]
fn test_brightness_shifts_are_equal_and_opposite() {
    let up = AdjustmentSet::new().with(Adjustment::Brightness, 0.1);
    let down = AdjustmentSet::new().with(Adjustment::Brightness, -0.1);

    let up_offset = TransformEngine::new(&up).combined_matrix().unwrap().to_rows()[0][4];
    let down_offset = TransformEngine::new(&down).combined_matrix().unwrap().to_rows()[0][4];
    assert!((up_offset - 25.5).abs() < 1e-4);
    assert!((up_offset + down_offset).abs() < 1e-6);

    // 128 ± 25.5 lands on a half step, rounded away from zero.
    assert_eq!(single([128, 128, 128, 255], up), [154, 154, 154, 255]);
    assert_eq!(single([128, 128, 128, 255], down), [103, 103, 103, 255]);
}

#[test]
fn test_contrast_keeps_midpoint() {
    for v in [-1.0, -0.5, 0.3, 1.0, 5.0] {
        let set = AdjustmentSet::new().with(Adjustment::Contrast, v);
        assert_eq!(single([128, 128, 128, 255], set), [128, 128, 128, 255], "v={v}");
    }
}

#[test]
fn test_exposure_doubles_and_clamps() {
    let set = AdjustmentSet::new().with(Adjustment::Exposure, 1.0);
    assert_eq!(single([100, 100, 100, 255], set), [200, 200, 200, 255]);
    assert_eq!(single([200, 200, 200, 255], set), [255, 255, 255, 255]);

    let halve = AdjustmentSet::new().with(Adjustment::Exposure, -1.0);
    assert_eq!(single([100, 50, 20, 255], halve), [50, 25, 10, 255]);
}

#[test]
fn test_full_desaturation_gives_luma_gray() {
    let set = AdjustmentSet::new().with(Adjustment::Saturation, -1.0);
    // 0.213 × 255 = 54.3
    assert_eq!(single([255, 0, 0, 255], set), [54, 54, 54, 255]);
    // 0.715 × 255 = 182.3
    assert_eq!(single([0, 255, 0, 255], set), [182, 182, 182, 255]);
}

#[test]
fn test_warmth_and_tint_directions() {
    let warm = AdjustmentSet::new().with(Adjustment::Warmth, 1.0);
    let px = single([100, 100, 100, 255], warm);
    assert_eq!(px, [130, 100, 70, 255]);

    let magenta = AdjustmentSet::new().with(Adjustment::Tint, 1.0);
    assert_eq!(single([100, 100, 100, 255], magenta), [120, 80, 120, 255]);

    let green = AdjustmentSet::new().with(Adjustment::Tint, -1.0);
    assert_eq!(single([100, 100, 100, 255], green), [80, 120, 80, 255]);
}

#[test]
fn test_order_is_canonical_not_commuted() {
    let set = AdjustmentSet::new()
        .with(Adjustment::Contrast, 0.5)
        .with(Adjustment::Brightness, 0.1);
    // Brightness first: (100 + 25.5) × 1.5 − 64 = 124.25.
    // Contrast first would give 100 × 1.5 − 64 + 25.5 = 111.5.
    assert_eq!(single([100, 100, 100, 255], set), [124, 124, 124, 255]);
}

#[test]
fn test_extreme_intensities_clamp() {
    let image = create_test_gradient(16, 16);
    for adj in Adjustment::ALL {
        for v in [-10.0, 10.0] {
            let set = AdjustmentSet::new().with(adj, v);
            let out = apply(&image, &set).unwrap();
            assert_eq!(out.len(), image.len());
            for (src, dst) in image.pixels.iter().zip(&out.pixels) {
                assert_eq!(src[3], dst[3], "{adj}={v} changed alpha");
            }
        }
    }

    let white = AdjustmentSet::new().with(Adjustment::Brightness, 10.0);
    assert_eq!(single([0, 10, 20, 7], white), [255, 255, 255, 7]);
    let black = AdjustmentSet::new().with(Adjustment::Brightness, -10.0);
    assert_eq!(single([255, 240, 230, 7], black), [0, 0, 0, 7]);
    let blown = AdjustmentSet::new().with(Adjustment::Exposure, 10.0);
    assert_eq!(single([1, 0, 2, 9], blown), [255, 0, 255, 9]);
}

#[test]
fn test_huge_intensities_saturate_without_losing_alpha() {
    let bright = AdjustmentSet::new()
        .with(Adjustment::Exposure, 200.0)
        .with(Adjustment::Warmth, 0.1);
    assert_eq!(single([10, 10, 10, 200], bright), [255, 255, 255, 200]);
    assert_eq!(single([0, 0, 0, 200], bright), [0, 0, 0, 200]);

    let blown = AdjustmentSet::new()
        .with(Adjustment::Brightness, 1e37)
        .with(Adjustment::Contrast, 0.5);
    assert_eq!(single([10, 10, 10, 200], blown), [255, 255, 255, 200]);

    let crushed = AdjustmentSet::from_json_map(&object(json!({
        "brightness": -1e37, "exposure": "300", "saturation": 1e30,
    })));
    assert_eq!(single([250, 120, 30, 77], crushed), [0, 0, 0, 77]);
}

#[test]
fn test_dimensions_and_alpha_preserved_by_full_chain() {
    let image = create_test_gradient(13, 7);
    let set = AdjustmentSet::new()
        .with(Adjustment::Exposure, 0.4)
        .with(Adjustment::Brightness, -0.2)
        .with(Adjustment::Contrast, 0.6)
        .with(Adjustment::Saturation, 0.8)
        .with(Adjustment::Warmth, -0.5)
        .with(Adjustment::Tint, 0.3);
    let out = apply(&image, &set).unwrap();
    assert_eq!((out.width, out.height), (13, 7));
    assert_eq!(out.len(), 13 * 7);
    for (src, dst) in image.pixels.iter().zip(&out.pixels) {
        assert_eq!(src[3], dst[3]);
    }
}

#[test]
fn test_parallel_matches_serial() {
    let image = create_test_gradient(64, 40);
    let set = AdjustmentSet::new()
        .with(Adjustment::Brightness, 0.05)
        .with(Adjustment::Saturation, -0.4)
        .with(Adjustment::Warmth, 0.7);
    let serial = TransformEngine::with_options(
        &set,
        EngineOptions {
            parallel_threshold: usize::MAX,
        },
    );
    let parallel = TransformEngine::with_options(
        &set,
        EngineOptions {
            parallel_threshold: 1,
        },
    );
    let a = serial.apply(&image).unwrap();
    let b = parallel.apply(&image).unwrap();
    assert_eq!(a.pixels, b.pixels);

    let mut in_place = image.clone();
    parallel.apply_in_place(&mut in_place);
    assert_eq!(in_place.pixels, a.pixels);
}
