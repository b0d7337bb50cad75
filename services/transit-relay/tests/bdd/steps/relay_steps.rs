//! BDD step definitions for the relay feature

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{Method, Request};
use cucumber::{given, then, when};
use tokio::sync::RwLock;
use tower::ServiceExt;

use transit_relay::config::ServerConfig;
use transit_relay::io::{HttpResponse, UpstreamClient};
use transit_relay::routes::{build_router, GRAPHQL_PROXY_PATH};
use transit_relay::{Relay, RelayError};

use crate::world::RelayWorld;

/// Upstream double that records bodies and replays a canned answer
#[derive(Debug)]
pub struct StubUpstream {
    reply: Result<HttpResponse, String>,
    pub bodies: RwLock<Vec<Bytes>>,
}

impl StubUpstream {
    fn new(reply: Result<HttpResponse, String>) -> Self {
        Self {
            reply,
            bodies: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl UpstreamClient for StubUpstream {
    async fn post_json(&self, body: Bytes) -> transit_relay::Result<HttpResponse> {
        self.bodies.write().await.push(body);
        self.reply.clone().map_err(RelayError::Upstream)
    }
}

#[given(expr = "an upstream that answers {int} with {string}")]
fn upstream_answers(world: &mut RelayWorld, status: u16, body: String) {
    world.upstream = Some(Arc::new(StubUpstream::new(Ok(HttpResponse {
        status,
        body: Bytes::from(body),
    }))));
}

#[given("an upstream that refuses connections")]
fn upstream_refuses(world: &mut RelayWorld) {
    world.upstream = Some(Arc::new(StubUpstream::new(Err(
        "POST http://127.0.0.1:1/graphql failed: connection refused".to_string(),
    ))));
}

#[when(expr = "the client posts {string} to the relay")]
async fn client_posts(world: &mut RelayWorld, body: String) {
    let upstream = world.upstream.clone().expect("upstream not set");
    let app = build_router(Relay::new(upstream), &ServerConfig::default());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(GRAPHQL_PROXY_PATH)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    world.response_status = Some(response.status().as_u16());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_body = Some(String::from_utf8(bytes.to_vec()).unwrap());
}

#[then(expr = "the relay should respond with status {int}")]
fn relay_status(world: &mut RelayWorld, status: u16) {
    assert_eq!(world.response_status, Some(status));
}

#[then(expr = "the relay response body should be {string}")]
fn relay_body(world: &mut RelayWorld, body: String) {
    assert_eq!(world.response_body.as_deref(), Some(body.as_str()));
}

#[then(expr = "the relay response should carry an error mentioning {string}")]
fn relay_error_mentions(world: &mut RelayWorld, fragment: String) {
    let body = world.response_body.as_ref().expect("no response body");
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    let error = json["error"]
        .as_str()
        .unwrap_or_else(|| panic!("no error field in {}", body));
    assert!(
        error.contains(&fragment),
        "expected '{}' in error '{}'",
        fragment,
        error
    );
}

#[then(expr = "the upstream should have received exactly {int} call(s)")]
async fn upstream_call_count(world: &mut RelayWorld, count: usize) {
    let upstream = world.upstream.as_ref().expect("upstream not set");
    assert_eq!(upstream.bodies.read().await.len(), count);
}

#[then(expr = "the upstream should have received {string}")]
async fn upstream_received(world: &mut RelayWorld, body: String) {
    let upstream = world.upstream.as_ref().expect("upstream not set");
    let bodies = upstream.bodies.read().await;
    assert_eq!(bodies.last().map(|b| &b[..]), Some(body.as_bytes()));
}
