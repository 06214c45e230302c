//! Adjustment names, intensity sets, and boundary value coercion.
//!
//! [`AdjustmentSet`] is the single input to the transform: one signed
//! intensity per [`Adjustment`], `0.0` meaning "no effect". Values are
//! conventionally in `[-1.0, 1.0]` but are not range-checked.

pub mod builder;

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

/// One of the six supported photographic adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Adjustment {
    /// Multiplicative exposure in stops (`2^v`).
    Exposure,
    /// Additive brightness shift.
    Brightness,
    /// Contrast around the 128 midpoint.
    Contrast,
    /// Luminance-preserving saturation.
    Saturation,
    /// Red/blue color temperature balance.
    Warmth,
    /// Green/magenta balance.
    Tint,
}

impl Adjustment {
    /// Every adjustment, in the order reported by capability queries.
    pub const ALL: [Self; 6] = [
        Self::Exposure,
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::Warmth,
        Self::Tint,
    ];

    /// Order in which matrices are concatenated. Each entry is applied to the
    /// output of the ones before it.
    pub const COMPOSITION_ORDER: [Self; 6] = [
        Self::Brightness,
        Self::Contrast,
        Self::Exposure,
        Self::Saturation,
        Self::Warmth,
        Self::Tint,
    ];

    /// Wire name used in adjustment maps.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Exposure => "exposure",
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::Warmth => "warmth",
            Self::Tint => "tint",
        }
    }

    /// Names of every supported adjustment.
    pub fn supported_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::name).collect()
    }

    const fn index(self) -> usize {
        match self {
            Self::Exposure => 0,
            Self::Brightness => 1,
            Self::Contrast => 2,
            Self::Saturation => 3,
            Self::Warmth => 4,
            Self::Tint => 5,
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by [`Adjustment::from_str`] for names outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported adjustment: {0}")]
pub struct UnsupportedAdjustment(pub String);

impl FromStr for Adjustment {
    type Err = UnsupportedAdjustment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|adj| adj.name() == s)
            .ok_or_else(|| UnsupportedAdjustment(s.to_string()))
    }
}

/// Intensity per adjustment. Missing entries are `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdjustmentSet {
    values: [f32; 6],
}

impl AdjustmentSet {
    /// Every intensity at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, adjustment: Adjustment, intensity: f32) -> Self {
        self.set(adjustment, intensity);
        self
    }

    /// Set one intensity.
    pub fn set(&mut self, adjustment: Adjustment, intensity: f32) {
        self.values[adjustment.index()] = intensity;
    }

    /// Intensity for `adjustment`.
    pub fn get(&self, adjustment: Adjustment) -> f32 {
        self.values[adjustment.index()]
    }

    /// True when no adjustment has a non-zero intensity.
    pub fn is_identity(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Non-zero adjustments in composition order.
    pub fn active(&self) -> impl Iterator<Item = (Adjustment, f32)> + '_ {
        Adjustment::COMPOSITION_ORDER
            .into_iter()
            .map(|adj| (adj, self.get(adj)))
            .filter(|(_, v)| *v != 0.0)
    }

    /// Build from a loosely typed string-keyed map.
    ///
    /// Unknown keys are dropped. Values go through [`coerce_intensity`].
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut set = Self::default();
        for (key, value) in map {
            match key.parse::<Adjustment>() {
                Ok(adj) => set.set(adj, coerce_intensity(adj, value)),
                Err(e) => tracing::debug!("ignoring {e}"),
            }
        }
        set
    }
}

/// Coerce one adjustment value to an intensity.
///
/// Numbers are used as-is, strings are parsed as floats. Everything else
/// (and any non-finite result) becomes `0.0`.
pub fn coerce_intensity(adjustment: Adjustment, value: &Value) -> f32 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        Value::Null => return 0.0,
        other => {
            tracing::warn!("invalid value type for {adjustment}: {other}");
            return 0.0;
        }
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            tracing::warn!("could not coerce {adjustment} value {value} to a number");
            0.0
        }
    }
}
