//! `tonal` — apply photographic color adjustments from the command line or
//! serve them over a WebSocket method-call bridge.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tonal_bridge::{BridgeConfig, MethodHandler, codec, ws_bridge};
use tonal_core::{Adjustment, AdjustmentSet, TransformEngine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tonal", version, about = "Photographic color adjustments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the WebSocket method-call server.
    Serve {
        /// Interface to bind (default: TONAL_WS_HOST or 127.0.0.1).
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: TONAL_WS_PORT or 9400).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Adjust one image file and write the result as PNG.
    Apply {
        /// Source image.
        input: PathBuf,
        /// Destination PNG.
        output: PathBuf,
        #[command(flatten)]
        adjustments: AdjustmentArgs,
    },
    /// List supported adjustment names.
    Adjustments,
}

/// Intensities, conventionally in [-1, 1]. Omitted values are 0.
#[derive(Args, Debug)]
struct AdjustmentArgs {
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    exposure: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    brightness: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    contrast: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    saturation: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    warmth: f32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    tint: f32,
}

impl AdjustmentArgs {
    fn to_set(&self) -> AdjustmentSet {
        AdjustmentSet::new()
            .with(Adjustment::Exposure, self.exposure)
            .with(Adjustment::Brightness, self.brightness)
            .with(Adjustment::Contrast, self.contrast)
            .with(Adjustment::Saturation, self.saturation)
            .with(Adjustment::Warmth, self.warmth)
            .with(Adjustment::Tint, self.tint)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = BridgeConfig::default();

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(&config)
        }
        Command::Apply {
            input,
            output,
            adjustments,
        } => {
            let source = codec::load_file(&input, config.decode_limits())
                .with_context(|| format!("failed to load {}", input.display()))?;
            let engine = TransformEngine::with_options(&adjustments.to_set(), config.engine_options());
            let adjusted = engine.apply(&source)?;
            codec::save_png(&adjusted, &output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            tracing::info!(
                "wrote {} ({}x{})",
                output.display(),
                adjusted.width,
                adjusted.height
            );
            Ok(())
        }
        Command::Adjustments => {
            for name in Adjustment::supported_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn serve(config: &BridgeConfig) -> Result<()> {
    let handler = Arc::new(
        MethodHandler::new(config.engine_options()).with_limits(config.decode_limits()),
    );
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime for WS bridge")?;

    runtime.block_on(async move {
        let listener = ws_bridge::bind(&config.addr()).await?;
        ws_bridge::serve(listener, handler).await?;
        Ok::<_, anyhow::Error>(())
    })
}
