//! Configuration types for the live-data client

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::screen::ScreenKind;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
    #[serde(default)]
    pub screen: ScreenKind,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Keep showing the previous result instead of a loading banner on refresh ticks
    #[serde(default)]
    pub suppress_refresh_loading: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            screen: ScreenKind::default(),
            refresh_interval_seconds: default_refresh_interval(),
            request_timeout_seconds: default_request_timeout(),
            suppress_refresh_loading: false,
        }
    }
}

fn default_relay_url() -> String {
    "http://localhost:3001/graphql-proxy".to_string()
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::LiveDataError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    if config.refresh_interval_seconds == 0 {
        return Err(crate::LiveDataError::Config(
            "refresh_interval_seconds must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}
