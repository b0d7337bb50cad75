//! Relay HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

/// HTTP response from the relay
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over the relay call for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RelayClient: Send + Sync {
    /// POST a serialized GraphQL request to the relay
    async fn post_graphql(&self, body: &str) -> crate::Result<HttpResponse>;
}

/// Production relay client using reqwest
#[derive(Debug)]
pub struct ReqwestRelayClient {
    client: reqwest::Client,
    relay_url: String,
}

impl ReqwestRelayClient {
    pub fn new(relay_url: &str, timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::LiveDataError::Config(format!("Building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            relay_url: relay_url.to_string(),
        })
    }
}

#[async_trait]
impl RelayClient for ReqwestRelayClient {
    async fn post_graphql(&self, body: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", self.relay_url);
        let response = self
            .client
            .post(&self.relay_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| crate::LiveDataError::Transport {
                reason: format!("POST {} failed: {}", self.relay_url, e),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::LiveDataError::Transport {
                reason: format!("Reading response body: {}", e),
            })?;

        tracing::debug!("POST {} -> {} ({} bytes)", self.relay_url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
