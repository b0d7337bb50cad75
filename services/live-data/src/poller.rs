//! Scoped polling tasks
//!
//! Each mounted query runs in its own task owning the `watch::Sender` of its
//! [`QueryState`]. The [`PollGuard`] cancels the task when dropped, and the
//! task checks the token under the channel lock before every write, so no
//! state update lands after unmount.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::io::RelayClient;
use crate::query::{LiveQuery, QueryState};

/// Shortest refresh period a query will poll at
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// How a mounted query repeats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOptions {
    /// `None` fetches once at mount
    pub refresh: Option<Duration>,
    pub suppress_refresh_loading: bool,
}

impl PollOptions {
    pub fn once() -> Self {
        Self::default()
    }

    pub fn every(interval: Duration) -> Self {
        Self {
            refresh: Some(interval),
            suppress_refresh_loading: false,
        }
    }

    /// Raise a refresh period below [`MIN_REFRESH_INTERVAL`] to the minimum
    pub fn clamped(self) -> Self {
        Self {
            refresh: self.refresh.map(|i| i.max(MIN_REFRESH_INTERVAL)),
            ..self
        }
    }
}

/// Cancels its polling task when dropped
#[derive(Debug)]
pub struct PollGuard {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PollGuard {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to finish
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Polling task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// A mounted query: its state receiver plus the guard that keeps it alive
#[derive(Debug)]
pub struct QueryHandle<T> {
    name: &'static str,
    state: watch::Receiver<QueryState<T>>,
    closed: bool,
    guard: PollGuard,
}

impl<T: Clone> QueryHandle<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Snapshot of the current state
    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.clone()
    }

    /// Whether the task has finished and no further changes will arrive
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Wait for the next state change. Returns `false` once the task is done.
    pub async fn changed(&mut self) -> bool {
        if self.closed {
            return false;
        }
        if self.state.changed().await.is_ok() {
            true
        } else {
            self.closed = true;
            false
        }
    }

    pub async fn unmount(self) {
        tracing::debug!("Unmounting query '{}'", self.name);
        self.guard.stop().await;
    }
}

/// Mount `query`: spawn its polling task under a child of `parent`
pub fn spawn_query<T>(
    query: LiveQuery<T>,
    client: Arc<dyn RelayClient>,
    options: PollOptions,
    parent: &CancellationToken,
) -> QueryHandle<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    if options.refresh.is_some_and(|i| i < MIN_REFRESH_INTERVAL) {
        tracing::warn!(
            "Refresh interval for '{}' raised to {:?}",
            query.name,
            MIN_REFRESH_INTERVAL
        );
    }
    let options = options.clamped();
    let cancel = parent.child_token();
    let (state_tx, state_rx) = watch::channel(QueryState::default());

    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        poll_loop(query, client, options, state_tx, task_cancel).await;
    });

    QueryHandle {
        name: query.name,
        state: state_rx,
        closed: false,
        guard: PollGuard {
            cancel,
            handle: Some(handle),
        },
    }
}

async fn poll_loop<T>(
    query: LiveQuery<T>,
    client: Arc<dyn RelayClient>,
    options: PollOptions,
    state: watch::Sender<QueryState<T>>,
    cancel: CancellationToken,
) where
    T: DeserializeOwned,
{
    let mut first_cycle = true;

    loop {
        if first_cycle || !options.suppress_refresh_loading {
            state.send_if_modified(|s| {
                if cancel.is_cancelled() {
                    return false;
                }
                s.begin();
                true
            });
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Query '{}' cancelled while in flight", query.name);
                break;
            }
            result = query.fetch(client.as_ref()) => result,
        };

        match &result {
            Ok(_) => tracing::debug!("Query '{}' succeeded", query.name),
            Err(e) => tracing::warn!("Query '{}' failed: {}", query.name, e),
        }

        let applied = state.send_if_modified(|s| {
            if cancel.is_cancelled() {
                return false;
            }
            s.apply(result);
            true
        });
        if !applied {
            tracing::debug!("Discarded result of '{}' after unmount", query.name);
            break;
        }

        first_cycle = false;

        let Some(interval) = options.refresh else {
            break;
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Polling loop for '{}' cancelled", query.name);
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
