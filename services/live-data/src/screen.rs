//! Live screens: sets of mounted queries sharing one lifetime

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::io::RelayClient;
use crate::model::{Alert, Station};
use crate::poller::{spawn_query, PollOptions, QueryHandle};
use crate::query::LiveQuery;
use crate::render;

/// Which screen to mount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenKind {
    /// Station inventory and disruption alerts, fetched once
    #[default]
    Live,
    /// Station positions, refreshed on the configured interval
    BikeMap,
}

/// A screen whose queries are running. Dropping it cancels every query
/// through the guards held by each [`QueryHandle`].
#[derive(Debug)]
pub enum MountedScreen {
    Live {
        stations: QueryHandle<Vec<Station>>,
        alerts: QueryHandle<Vec<Alert>>,
        cancel: CancellationToken,
    },
    BikeMap {
        stations: QueryHandle<Vec<Station>>,
        cancel: CancellationToken,
    },
}

impl MountedScreen {
    pub fn mount(kind: ScreenKind, client: Arc<dyn RelayClient>, config: &Config) -> Self {
        let cancel = CancellationToken::new();
        tracing::debug!("Mounting {:?} screen", kind);

        match kind {
            ScreenKind::Live => {
                let stations = spawn_query(
                    LiveQuery::stations(),
                    Arc::clone(&client),
                    PollOptions::once(),
                    &cancel,
                );
                let alerts =
                    spawn_query(LiveQuery::alerts(), client, PollOptions::once(), &cancel);
                MountedScreen::Live {
                    stations,
                    alerts,
                    cancel,
                }
            }
            ScreenKind::BikeMap => {
                let options = PollOptions {
                    refresh: Some(Duration::from_secs(config.refresh_interval_seconds)),
                    suppress_refresh_loading: config.suppress_refresh_loading,
                };
                let stations = spawn_query(LiveQuery::stations(), client, options, &cancel);
                MountedScreen::BikeMap { stations, cancel }
            }
        }
    }

    pub fn kind(&self) -> ScreenKind {
        match self {
            MountedScreen::Live { .. } => ScreenKind::Live,
            MountedScreen::BikeMap { .. } => ScreenKind::BikeMap,
        }
    }

    pub fn stations(&self) -> &QueryHandle<Vec<Station>> {
        match self {
            MountedScreen::Live { stations, .. } | MountedScreen::BikeMap { stations, .. } => {
                stations
            }
        }
    }

    pub fn alerts(&self) -> Option<&QueryHandle<Vec<Alert>>> {
        match self {
            MountedScreen::Live { alerts, .. } => Some(alerts),
            MountedScreen::BikeMap { .. } => None,
        }
    }

    /// Wait for any query on the screen to change. `false` once none can.
    pub async fn changed(&mut self) -> bool {
        match self {
            MountedScreen::Live {
                stations, alerts, ..
            } => loop {
                if stations.is_closed() && alerts.is_closed() {
                    return false;
                }
                tokio::select! {
                    changed = stations.changed(), if !stations.is_closed() => {
                        if changed {
                            return true;
                        }
                    }
                    changed = alerts.changed(), if !alerts.is_closed() => {
                        if changed {
                            return true;
                        }
                    }
                }
            },
            MountedScreen::BikeMap { stations, .. } => stations.changed().await,
        }
    }

    pub fn render(&self) -> String {
        match self {
            MountedScreen::Live {
                stations, alerts, ..
            } => format!(
                "Live HSL Data\n\n{}\n{}",
                render::render_stations(&stations.state()),
                render::render_alerts(&alerts.state())
            ),
            MountedScreen::BikeMap { stations, .. } => {
                render::render_bike_map(&stations.state())
            }
        }
    }

    /// Cancel all queries and wait for their tasks to end
    pub async fn unmount(self) {
        tracing::debug!("Unmounting {:?} screen", self.kind());
        match self {
            MountedScreen::Live {
                stations,
                alerts,
                cancel,
            } => {
                cancel.cancel();
                stations.unmount().await;
                alerts.unmount().await;
            }
            MountedScreen::BikeMap { stations, cancel } => {
                cancel.cancel();
                stations.unmount().await;
            }
        }
    }
}
