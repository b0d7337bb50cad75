//! Fixed live queries and their per-query display state

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::graphql::{self, GraphQlRequest, ALERTS_DOCUMENT, STATIONS_DOCUMENT};
use crate::io::RelayClient;
use crate::model::{Alert, Station};

/// Display state of one query: `idle -> loading -> {success, error} -> loading -> ...`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> QueryState<T> {
    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }

    /// Start of a fetch cycle
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// End of a fetch cycle. Replaces the previous result entirely; an error
    /// clears `data` so stale results never sit under an error banner.
    pub fn apply(&mut self, result: crate::Result<T>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(e) => {
                self.data = None;
                self.error = Some(e.to_string());
            }
        }
    }
}

/// A fixed GraphQL document and the `data` field its payload lives under
#[derive(Debug)]
pub struct LiveQuery<T> {
    pub name: &'static str,
    pub document: &'static str,
    pub root_field: &'static str,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for LiveQuery<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LiveQuery<T> {}

impl<T: DeserializeOwned> LiveQuery<T> {
    pub const fn new(name: &'static str, document: &'static str, root_field: &'static str) -> Self {
        Self {
            name,
            document,
            root_field,
            _payload: PhantomData,
        }
    }

    /// One request/response round trip through the relay
    pub async fn fetch(&self, client: &dyn RelayClient) -> crate::Result<T> {
        let body = GraphQlRequest::new(self.document).to_body()?;
        let response = client.post_graphql(&body).await?;
        let value = graphql::interpret_response(&response, self.root_field)?;
        serde_json::from_value(value).map_err(|e| {
            crate::LiveDataError::Decode(format!("{}: {}", self.root_field, e))
        })
    }
}

impl LiveQuery<Vec<Station>> {
    pub const fn stations() -> Self {
        Self::new("stations", STATIONS_DOCUMENT, "vehicleRentalStations")
    }
}

impl LiveQuery<Vec<Alert>> {
    pub const fn alerts() -> Self {
        Self::new("alerts", ALERTS_DOCUMENT, "alerts")
    }
}
