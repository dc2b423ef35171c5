//! Medina Storefront - Public e-commerce service.
//!
//! # Architecture
//!
//! - Axum JSON API consumed by the web client
//! - Hosted data platform for products, orders, and authentication
//! - Session-scoped cart held in tower-sessions (in-process store)
//!
//! # Security
//!
//! This service only holds the platform's anon key. Customer-scoped reads
//! and writes attach the customer's own access token so the platform's
//! row-level rules decide what is visible. The service-role key lives in
//! the admin binary only.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
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
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the data platform is reachable before returning OK.
/// Returns 503 Service Unavailable otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.data().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
