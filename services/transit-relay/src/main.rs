//! Transit relay CLI
//!
//! Command-line interface for the GraphQL pass-through relay.

use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use transit_relay::{load_config, Config, RelayBuilder};

#[derive(Parser)]
#[command(name = "transit-relay")]
#[command(about = "GraphQL pass-through relay for the upstream transit API")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Upstream GraphQL endpoint (overrides config file)
    #[arg(long)]
    upstream_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, upstream_url={:?}, log_level={:?}",
        args.config,
        args.port,
        args.upstream_url,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets()?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(upstream_url) = args.upstream_url {
        config.upstream.url = upstream_url;
    }

    tracing::info!("Starting transit relay");
    tracing::debug!("Upstream: {}", config.upstream.url);

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

    RelayBuilder::new(config)
        .with_cancellation_token(cancel)
        .build()
        .await?
        .start()
        .await?;

    Ok(())
}
