//! HTTP surface of the relay

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::relay::Relay;

pub const GRAPHQL_PROXY_PATH: &str = "/graphql-proxy";

/// Build the relay axum router
pub fn build_router(relay: Relay, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route(GRAPHQL_PROXY_PATH, post(graphql_proxy_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .with_state(relay);

    if server.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn graphql_proxy_handler(State(relay): State<Relay>, body: Bytes) -> impl IntoResponse {
    relay.relay(body).await
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
