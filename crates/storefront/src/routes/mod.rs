//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (probes the platform)
//!
//! # Products
//! GET  /products               - Product listing (?category=, ?q=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (session-scoped)
//! GET  /cart                   - Cart view
//! POST /cart/add               - Add a product (merges on product+size)
//! POST /cart/update            - Adjust a line quantity by delta
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Badge count
//!
//! # Checkout
//! GET  /checkout/quote         - Subtotal/shipping/total preview
//! POST /checkout               - Place the order
//!
//! # Auth
//! POST /auth/register          - Create an account
//! POST /auth/login             - Sign in
//! POST /auth/logout            - Sign out
//! GET  /auth/me                - Current customer
//!
//! # Orders (requires auth)
//! GET  /orders                 - The caller's order history
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .route("/checkout/quote", get(checkout::quote))
        .nest("/auth", auth_routes())
        .route("/orders", get(orders::index))
}
