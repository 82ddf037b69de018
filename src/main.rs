use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod error;
mod events;
pub mod mappings;
mod services;
mod utils;

use config::Config;
use events::HostEvent;
use services::{create_host, ComboDetector, EscalationController};

#[derive(Parser, Debug)]
#[command(name = "ragequit")]
#[command(about = "Two-stage rage-quit hotkey: leave the match first, then quit the game")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "ragequit.toml")]
    config: String,

    /// Dry-run mode (emulated game host, actions are only logged)
    #[arg(long)]
    dry_run: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level)?;

    info!("Starting ragequit v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(Config::load(&args.config)?);
    info!("Configuration loaded from: {}", args.config);

    if args.dry_run {
        warn!("Dry-run mode - no commands will reach a real game client");
    } else {
        utils::permissions::check_permissions()?;
    }

    let (host, mut host_events) = create_host(config.clone(), args.dry_run).await?;
    let controller = Arc::new(EscalationController::new(config.clone(), host.clone()));
    let detector = ComboDetector::new(config.clone(), host.clone(), controller.clone());

    info!("All components initialized");

    let detector_handle = tokio::spawn(async move {
        if let Err(e) = detector.run().await {
            error!("ComboDetector error: {}", e);
        }
    });

    // Host-pushed plugin commands: manual trigger and the enable gate
    let dispatch_controller = controller.clone();
    let dispatch_handle = tokio::spawn(async move {
        while let Some(event) = host_events.recv().await {
            match event {
                HostEvent::ManualTrigger => dispatch_controller.on_trigger().await,
                HostEvent::SetEnabled(enabled) => dispatch_controller.set_enabled(enabled),
            }
        }
        warn!("Host event channel closed");
    });

    info!("All services running");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal (Ctrl+C)");
        }
        Err(err) => {
            error!("Error waiting for shutdown signal: {}", err);
        }
    }

    info!("Shutting down...");

    detector_handle.abort();
    dispatch_handle.abort();

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = detector_handle.await;
        let _ = dispatch_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("All services stopped cleanly"),
        Err(_) => warn!("Timed out waiting for services to stop"),
    }

    info!("ragequit stopped");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
