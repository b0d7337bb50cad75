//! Configuration types for the transit relay

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Inbound HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub cors: bool,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            cors: true,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Upstream GraphQL endpoint and the credential attached to every call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_url")]
    pub url: String,
    #[serde(default = "default_credential_header")]
    pub credential_header: String,
    #[serde(default)]
    pub subscription_key: String,
    /// Environment variable consulted when `subscription_key` is empty
    #[serde(default = "default_subscription_key_env")]
    pub subscription_key_env: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            credential_header: default_credential_header(),
            subscription_key: String::new(),
            subscription_key_env: default_subscription_key_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    /// Fill in the subscription key from the environment if the file left it empty.
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.resolve_secrets_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_secrets_with<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !self.upstream.subscription_key.is_empty() {
            return Ok(());
        }

        match lookup(&self.upstream.subscription_key_env) {
            Some(key) if !key.is_empty() => {
                tracing::debug!(
                    "Subscription key read from ${}",
                    self.upstream.subscription_key_env
                );
                self.upstream.subscription_key = key;
                Ok(())
            }
            _ => Err(crate::RelayError::Config(format!(
                "No subscription key configured and ${} is not set",
                self.upstream.subscription_key_env
            ))),
        }
    }
}

fn default_port() -> u16 {
    3001
}

fn default_true() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_upstream_url() -> String {
    "https://api.digitransit.fi/routing/v2/hsl/gtfs/v1".to_string()
}

fn default_credential_header() -> String {
    "digitransit-subscription-key".to_string()
}

fn default_subscription_key_env() -> String {
    "DIGITRANSIT_SUBSCRIPTION_KEY".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::RelayError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
