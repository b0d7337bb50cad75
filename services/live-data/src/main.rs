//! Live-data CLI
//!
//! Mounts a live transit screen against the relay and prints it as it updates.

use std::path::PathBuf;

use clap::Parser;
use live_data::{load_config, Config, ScreenKind};
use tokio_util::sync::CancellationToken;
use tracing::Level;

#[derive(Parser)]
#[command(name = "live-data")]
#[command(about = "Live transit data client for the GraphQL relay")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Relay endpoint (overrides config file)
    #[arg(long)]
    relay_url: Option<String>,

    /// Screen to mount (overrides config file)
    #[arg(short, long, value_enum)]
    screen: Option<ScreenKind>,

    /// Refresh interval in seconds for polling screens (overrides config file)
    #[arg(long)]
    refresh_interval: Option<u64>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(relay_url) = args.relay_url {
        config.relay_url = relay_url;
    }
    if let Some(screen) = args.screen {
        config.screen = screen;
    }
    if let Some(refresh_interval) = args.refresh_interval {
        if refresh_interval == 0 {
            return Err("--refresh-interval must be greater than zero".into());
        }
        config.refresh_interval_seconds = refresh_interval;
    }

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    live_data::run(config, cancel).await?;

    Ok(())
}
