//! HTTP route handlers for the admin service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check
//!
//! # Auth
//! POST /auth/login                  - Sign in (credentials + role check)
//! POST /auth/logout                 - Sign out
//! GET  /auth/me                     - Current admin
//!
//! # Orders
//! GET  /orders                      - List (?status=, ?q=)
//! GET  /orders/{id}                 - Detail with line items
//! POST /orders/{id}/status          - Change status
//!
//! # Products
//! GET    /products                  - List
//! POST   /products                  - Create
//! PATCH  /products/{id}             - Partial update
//! DELETE /products/{id}             - Delete
//! POST   /products/{id}/image       - Upload image to platform storage
//!
//! # Customers & analytics
//! GET  /customers                   - Customers derived from orders (?q=)
//! GET  /dashboard                   - Headline stats + recent orders
//! GET  /analytics                   - Full sales breakdowns
//!
//! # Notifications
//! GET  /notifications               - Bell feed with unread count
//! POST /notifications/{id}/read     - Mark one read
//! POST /notifications/read-all      - Mark all read
//! ```
//!
//! Everything except login is guarded by the `RequireAdminAuth` extractor
//! in each handler.

pub mod analytics;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod notifications;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    use axum::routing::patch;

    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", patch(products::update).delete(products::remove))
        .route("/{id}/image", post(products::upload_image))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/read-all", post(notifications::mark_all_read))
}

/// Create all routes for the admin service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/orders", order_routes())
        .nest("/products", product_routes())
        .nest("/notifications", notification_routes())
        .route("/customers", get(customers::index))
        .route("/dashboard", get(dashboard::index))
        .route("/analytics", get(analytics::index))
}
