//! Upstream HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::config::UpstreamConfig;

/// HTTP response from the upstream endpoint, body exactly as received
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

/// Abstraction over the upstream call for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UpstreamClient: Send + Sync {
    /// POST a JSON body to the upstream GraphQL endpoint
    async fn post_json(&self, body: Bytes) -> crate::Result<HttpResponse>;
}

/// Production upstream client using reqwest
///
/// The endpoint and credential are fixed at construction; every call carries
/// `Content-Type: application/json` and the credential header.
pub struct ReqwestUpstreamClient {
    client: reqwest::Client,
    url: String,
    credential_header: String,
    subscription_key: String,
}

impl std::fmt::Debug for ReqwestUpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestUpstreamClient")
            .field("url", &self.url)
            .field("credential_header", &self.credential_header)
            .finish()
    }
}

impl ReqwestUpstreamClient {
    pub fn new(config: &UpstreamConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| crate::RelayError::Config(format!("Building HTTP client: {}", e)))?;

        tracing::debug!("Created upstream client for {}", config.url);

        Ok(Self {
            client,
            url: config.url.clone(),
            credential_header: config.credential_header.clone(),
            subscription_key: config.subscription_key.clone(),
        })
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn post_json(&self, body: Bytes) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {} ({} bytes)", self.url, body.len());
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(self.credential_header.as_str(), self.subscription_key.as_str())
            .body(body)
            .send()
            .await
            .map_err(|e| crate::RelayError::Upstream(format!("POST {} failed: {}", self.url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| crate::RelayError::Upstream(format!("Reading response body: {}", e)))?;

        tracing::debug!("POST {} -> {} ({} bytes)", self.url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
