//! GraphQL request envelope and relay response interpretation

use serde::Serialize;
use serde_json::Value;

use crate::error::LiveDataError;
use crate::io::HttpResponse;

pub const STATIONS_DOCUMENT: &str = "{ vehicleRentalStations { stationId name lat lon allowPickup availableVehicles { byType { count vehicleType { formFactor } } } } }";

pub const ALERTS_DOCUMENT: &str = "{ alerts { alertHeaderText alertDescriptionText alertUrl effectiveStartDate effectiveEndDate alertSeverityLevel entities { __typename ... on Route { gtfsId } ... on Stop { gtfsId } } } }";

/// Body sent to the relay
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a Value>,
}

impl<'a> GraphQlRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            variables: None,
        }
    }

    pub fn to_body(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Any present, non-empty `errors` value counts, not only arrays
fn has_graphql_errors(body: &Value) -> bool {
    match body.get("errors") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Array(errors)) => !errors.is_empty(),
        Some(Value::String(message)) => !message.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Bool(true)) | Some(Value::Object(_)) => true,
    }
}

/// Turn a relay response into the value at `data.<root_field>`.
///
/// Non-2xx: the relay's `error` field wins, then upstream GraphQL errors, then
/// the bare status. 2xx: a non-empty `errors` array is a failure even when
/// `data` is present.
pub fn interpret_response(response: &HttpResponse, root_field: &str) -> crate::Result<Value> {
    let parsed = serde_json::from_str::<Value>(&response.body);

    if !(200..300).contains(&response.status) {
        let body = parsed.unwrap_or(Value::Null);
        if let Some(reason) = body.get("error").and_then(Value::as_str) {
            return Err(LiveDataError::Transport {
                reason: reason.to_string(),
            });
        }
        if has_graphql_errors(&body) {
            return Err(LiveDataError::UpstreamReported { body });
        }
        return Err(LiveDataError::Transport {
            reason: format!("HTTP error! status: {}", response.status),
        });
    }

    let mut body = parsed.map_err(|e| LiveDataError::Transport {
        reason: format!("Invalid JSON from relay: {}", e),
    })?;

    if has_graphql_errors(&body) {
        return Err(LiveDataError::UpstreamReported { body });
    }

    match body
        .get_mut("data")
        .and_then(|data| data.get_mut(root_field))
        .map(Value::take)
    {
        Some(Value::Null) | None => Err(LiveDataError::Decode(format!(
            "response has no data.{}",
            root_field
        ))),
        Some(value) => Ok(value),
    }
}
