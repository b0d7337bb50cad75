//! Live-data client - polls the transit relay and renders live screens
//!
//! Every screen mounts a fixed set of GraphQL queries. Each query keeps its
//! own `loading/error/data` state, refreshes on its own timer and stops when
//! the screen is unmounted or dropped.

pub mod config;
pub mod error;
pub mod graphql;
pub mod io;
pub mod model;
pub mod poller;
pub mod query;
pub mod render;
pub mod screen;

pub use config::{load_config, Config};
pub use error::{LiveDataError, Result};
pub use query::{LiveQuery, QueryState};
pub use screen::{MountedScreen, ScreenKind};

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::io::{RelayClient, ReqwestRelayClient};

/// Mount the configured screen and print it on every change until `cancel` fires
pub async fn run(config: Config, cancel: CancellationToken) -> Result<()> {
    let client: Arc<dyn RelayClient> = Arc::new(ReqwestRelayClient::new(
        &config.relay_url,
        Duration::from_secs(config.request_timeout_seconds),
    )?);
    run_with_client(config, client, cancel, std::io::stdout()).await
}

pub async fn run_with_client<W: Write>(
    config: Config,
    client: Arc<dyn RelayClient>,
    cancel: CancellationToken,
    mut out: W,
) -> Result<()> {
    let mut screen = MountedScreen::mount(config.screen, client, &config);
    tracing::info!("Mounted {:?} screen against {}", config.screen, config.relay_url);

    let result = loop {
        let changed = tokio::select! {
            _ = cancel.cancelled() => break Ok(()),
            changed = screen.changed() => changed,
        };
        if let Err(e) = writeln!(out, "{}", screen.render()) {
            break Err(e.into());
        }
        if !changed {
            // Nothing left to refresh; keep the final render up until shutdown.
            cancel.cancelled().await;
            break Ok(());
        }
    };

    screen.unmount().await;
    tracing::info!("Screen unmounted");
    result
}
