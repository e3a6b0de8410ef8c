//! FaceFrame - Virtual Eyewear Try-On Core
//!
//! Main entry point: receives landmark packets from the detector helper,
//! drives the per-frame pose pipeline, and forwards scene mutations to the
//! external renderer.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use faceframe::{
    config::Config,
    eyewear::{EyewearManager, FrameVariant, GltfLoader},
    output::WireScene,
    projection::Viewport,
    session::TryOnSession,
    tracking::{DetectorReceiver, LandmarkScheme},
};

/// FaceFrame - landmark-driven virtual eyewear overlay
#[derive(Parser, Debug)]
#[command(name = "faceframe", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Detector UDP port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Renderer address (overrides config)
    #[arg(short, long)]
    renderer: Option<String>,

    /// Initial frame variant (overrides config)
    #[arg(long)]
    variant: Option<FrameVariant>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", faceframe::NAME, faceframe::VERSION);

    // Load configuration
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.detector.port = port;
    }
    if let Some(ref renderer) = args.renderer {
        config.renderer.address = renderer.clone();
    }
    if let Some(variant) = args.variant {
        config.fit.variant = variant;
    }

    config.validate()?;

    info!("Detector port: {}", config.detector.port);
    info!("Renderer address: {}", config.renderer.address);
    info!("Initial variant: {}", config.fit.variant);

    // The renderer bridge is the one unrecoverable setup step: without a
    // scene there is nothing to pose
    let scene = WireScene::new(&config.renderer.address)?;

    let viewport = Viewport::new(
        config.renderer.viewport_width,
        config.renderer.viewport_height,
    )
    .ok_or_else(|| anyhow::anyhow!("Invalid viewport dimensions"))?;

    let manager = EyewearManager::new(GltfLoader::new(), config.eyewear.model_path.clone());
    let scheme = LandmarkScheme::from(&config.detector);
    let mut session = TryOnSession::new(scene, manager, viewport, config.fit.clone(), scheme);

    let mut receiver = DetectorReceiver::new(&config.detector);
    receiver.start()?;

    run_loop(&mut session, &receiver).await;

    receiver.stop();
    info!("FaceFrame stopped");
    Ok(())
}

/// Animation loop: one detection-and-update cycle per tick, until a
/// shutdown signal arrives.
async fn run_loop(
    session: &mut TryOnSession<WireScene, GltfLoader>,
    receiver: &DetectorReceiver,
) {
    let mut tick = tokio::time::interval(tokio::time::Duration::from_millis(5));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                match receiver.process() {
                    Ok(Some(packet)) => {
                        session.on_frame(&packet);
                    }
                    Ok(None) => {
                        // No packet this tick; still drain load completions
                        session.tick();
                    }
                    Err(e) => {
                        error!("Detector receive error: {e}");
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
