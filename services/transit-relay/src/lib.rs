//! Transit relay - GraphQL pass-through to the upstream transit API
//!
//! Accepts GraphQL payloads on `POST /graphql-proxy`, attaches the service
//! credential and forwards them upstream. Upstream responses are returned
//! unchanged; only transport failures are turned into `500 {"error": ...}`.

pub mod config;
pub mod error;
pub mod io;
pub mod relay;
pub mod routes;

pub use config::{load_config, Config};
pub use error::{RelayError, Result};
pub use relay::{Relay, RelayOutcome};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::io::{ReqwestUpstreamClient, UpstreamClient};

/// Assembles a [`RelayServer`] from configuration and optional injected parts
pub struct RelayBuilder {
    config: Config,
    upstream: Option<Arc<dyn UpstreamClient>>,
    cancel: Option<CancellationToken>,
}

impl RelayBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            upstream: None,
            cancel: None,
        }
    }

    /// Replace the reqwest-backed upstream client
    pub fn with_upstream_client(mut self, upstream: Arc<dyn UpstreamClient>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Create the upstream client and bind the listener
    pub async fn build(self) -> Result<RelayServer> {
        let upstream = match self.upstream {
            Some(upstream) => upstream,
            None => Arc::new(ReqwestUpstreamClient::new(&self.config.upstream)?),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            RelayError::Config(format!(
                "Failed to bind port {}: {}",
                self.config.server.port, e
            ))
        })?;

        let router = routes::build_router(Relay::new(upstream), &self.config.server);

        Ok(RelayServer {
            listener,
            router,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// A bound relay, ready to serve
pub struct RelayServer {
    listener: TcpListener,
    router: axum::Router,
    cancel: CancellationToken,
}

impl RelayServer {
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Serve until the cancellation token fires
    pub async fn start(self) -> Result<()> {
        let addr = self.local_addr()?;
        tracing::info!(
            "Proxy server running on http://{}{}",
            addr,
            routes::GRAPHQL_PROXY_PATH
        );

        let cancel = self.cancel;
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
            })
            .await?;

        tracing::info!("Proxy server stopped");
        Ok(())
    }
}
