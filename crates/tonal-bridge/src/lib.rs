//! Tonal Bridge — method-call plumbing around the adjustment engine.
//!
//! Decodes incoming images, coerces loosely typed adjustment maps, runs
//! [`tonal_core`], and re-encodes the result as PNG. Exposed over a
//! WebSocket method-call protocol and the `tonal` command-line tool.

pub mod codec;
pub mod config;
pub mod handler;
pub mod ipc;
pub mod ws_bridge;

pub use config::BridgeConfig;
pub use handler::{HandlerError, MethodHandler};
pub use ipc::{ErrorCode, Method, MethodCall, MethodResponse, MethodResult};
