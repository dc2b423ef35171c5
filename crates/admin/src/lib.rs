//! Medina Admin - Internal back-office service.
//!
//! # Architecture
//!
//! - Axum JSON API consumed by the admin web client
//! - Service-role access to the hosted data platform
//! - Order-insert feed: polling subscription -> broadcast channel ->
//!   in-process notification center
//!
//! # Security
//!
//! This binary holds the platform's service-role key, which bypasses
//! row-level rules. It must only be reachable from the internal network.
//! The storefront binary never sees this key.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod feed;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router for the given state.
///
/// Shared between `main` and the integration tests, which drive the router
/// against a mocked platform.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.data().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
