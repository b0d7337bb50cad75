//! The pass-through relay: one inbound body, one upstream call, one outcome

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::io::UpstreamClient;

/// Result of relaying one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Upstream answered with valid JSON. Status and body are passed through
    /// untouched, including 4xx/5xx and GraphQL `errors` payloads.
    Forwarded { status: u16, body: Bytes },
    /// Upstream could not be reached or did not answer with JSON.
    TransportFailure { reason: String },
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        match self {
            RelayOutcome::Forwarded { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            RelayOutcome::TransportFailure { reason } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": reason })),
            )
                .into_response(),
        }
    }
}

/// Stateless relay over an injected upstream client
#[derive(Clone)]
pub struct Relay {
    upstream: Arc<dyn UpstreamClient>,
}

impl Relay {
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { upstream }
    }

    /// Forward `body` upstream exactly once. Never retries.
    pub async fn relay(&self, body: Bytes) -> RelayOutcome {
        tracing::debug!("Relaying {} byte GraphQL payload", body.len());

        let response = match self.upstream.post_json(body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Proxy fetch error: {}", e);
                return RelayOutcome::TransportFailure {
                    reason: e.to_string(),
                };
            }
        };

        if let Err(e) = serde_json::from_slice::<serde::de::IgnoredAny>(&response.body) {
            tracing::error!(
                "Upstream returned status {} with a non-JSON body: {}",
                response.status,
                e
            );
            return RelayOutcome::TransportFailure {
                reason: format!("Invalid JSON from upstream: {}", e),
            };
        }

        if !(200..300).contains(&response.status) {
            tracing::warn!(
                "Upstream API error: status={} body={}",
                response.status,
                String::from_utf8_lossy(&response.body)
            );
        }

        RelayOutcome::Forwarded {
            status: response.status,
            body: response.body,
        }
    }
}
