//! Runtime configuration for the bridge.

use image::Limits;
use tonal_core::EngineOptions;
use tonal_core::engine::DEFAULT_PARALLEL_THRESHOLD;

/// Default WebSocket port for the method-call bridge.
const DEFAULT_WS_PORT: u16 = 9400;
/// Default bind address.
const DEFAULT_WS_HOST: &str = "127.0.0.1";

/// Runtime configuration for the tonal bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Interface the WebSocket server binds to.
    pub host: String,
    /// WebSocket port.
    pub port: u16,
    /// Pixel count at which transforms run on the rayon pool.
    pub parallel_threshold: usize,
    /// Largest width or height accepted when decoding, `None` for no cap.
    pub max_image_dimension: Option<u32>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TONAL_WS_HOST").unwrap_or_else(|_| DEFAULT_WS_HOST.to_string()),
            port: std::env::var("TONAL_WS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_WS_PORT),
            parallel_threshold: std::env::var("TONAL_PARALLEL_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
            max_image_dimension: std::env::var("TONAL_MAX_IMAGE_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }
}

impl BridgeConfig {
    /// `host:port` string for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Engine options derived from this configuration.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            parallel_threshold: self.parallel_threshold,
        }
    }

    /// Decoder limits: the `image` defaults, capped by `max_image_dimension`.
    pub fn decode_limits(&self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = self.max_image_dimension;
        limits.max_image_height = self.max_image_dimension;
        limits
    }
}
