//! Error types for the live-data client

use serde_json::Value;

/// Errors that can occur while fetching live data
///
/// `UpstreamReported` and `Transport` are kept apart so callers can tell
/// "upstream answered with a GraphQL error" from "we could not talk to it".
#[derive(Debug, thiserror::Error)]
pub enum LiveDataError {
    #[error("{}", join_error_messages(.body))]
    UpstreamReported { body: Value },

    #[error("{reason}")]
    Transport { reason: String },

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

fn error_message(error: &Value) -> &str {
    match error {
        Value::String(message) => message.as_str(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error"),
    }
}

/// Messages of a GraphQL `errors` value, joined with `", "`
///
/// A single error object or string that is not wrapped in an array is
/// reported on its own.
pub fn join_error_messages(body: &Value) -> String {
    match body.get("errors") {
        Some(Value::Array(errors)) => errors
            .iter()
            .map(error_message)
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Null) | None => String::new(),
        Some(other) => error_message(other).to_string(),
    }
}

/// Result type alias for live-data operations
pub type Result<T> = std::result::Result<T, LiveDataError>;
