//! Shared helpers for the integration tests.
//!
//! Each test boots a service against a `wiremock` server standing in for
//! the hosted data platform, then drives it over HTTP with a cookie-holding
//! `reqwest` client - the same way the real clients talk to the real thing.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)] // test support code panics on setup failure

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};

use medina_admin::config::AdminConfig;
use medina_storefront::config::{CheckoutConfig, StorefrontConfig};

/// API key used against the mocked platform.
pub const TEST_API_KEY: &str = "test-api-key";

/// Storefront config pointed at a mocked platform.
///
/// Shipping fee 10 below a free-shipping threshold of 300; bank transfer
/// enabled with a fixed reference.
#[must_use]
pub fn storefront_config(backend_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("loopback parses"),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        backend: medina_storefront::config::BackendConfig {
            url: backend_url.to_string(),
            api_key: SecretString::from(TEST_API_KEY),
        },
        checkout: CheckoutConfig {
            shipping_fee: "10".parse().expect("decimal parses"),
            free_shipping_threshold: "300".parse().expect("decimal parses"),
            bank_transfer_reference: Some("RIB-0042-TEST".to_string()),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Admin config pointed at a mocked platform, with a fast feed poll.
#[must_use]
pub fn admin_config(backend_url: &str) -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().expect("loopback parses"),
        port: 0,
        base_url: "http://localhost:3001".to_string(),
        backend: medina_admin::config::BackendConfig {
            url: backend_url.to_string(),
            service_key: SecretString::from(TEST_API_KEY),
        },
        storage_bucket: "product-images".to_string(),
        order_feed_poll_interval: Duration::from_millis(50),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Serve a storefront app on an ephemeral port; returns its base URL.
pub async fn spawn_storefront(config: StorefrontConfig) -> String {
    let state = medina_storefront::state::AppState::new(config).expect("state builds");
    let app = medina_storefront::app(state);
    serve(app).await
}

/// Serve an admin app on an ephemeral port; returns its base URL.
pub async fn spawn_admin(state: medina_admin::state::AppState) -> String {
    serve(medina_admin::app(state)).await
}

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port binds");
    let addr = listener.local_addr().expect("bound address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });

    format!("http://{addr}")
}

/// HTTP client with a cookie store, matching a browser session.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client builds")
}

/// A `products` row as the platform would return it.
#[must_use]
pub fn product_json(id: &str, name: &str, price: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price.parse::<f64>().expect("price literal"),
        "original_price": null,
        "image_url": null,
        "category": "shirts",
        "description": null,
        "is_new": false,
        "is_on_sale": false,
        "stock": 10,
        "created_at": "2026-02-01T09:00:00Z"
    })
}

/// An `orders` row as the platform would return it after insert.
#[must_use]
pub fn order_json(id: &str, total: f64, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "user_id": null,
        "customer_name": "Amina K",
        "customer_email": "amina@example.com",
        "customer_phone": null,
        "shipping_address": "12 Rue des Oliviers",
        "city": "Oran",
        "postal_code": null,
        "total_amount": total,
        "notes": null,
        "status": status,
        "created_at": created_at
    })
}

/// A valid checkout form body.
#[must_use]
pub fn checkout_form() -> Value {
    json!({
        "name": "Amina K",
        "email": "amina@example.com",
        "phone": "",
        "shipping_address": "12 Rue des Oliviers",
        "city": "Oran",
        "postal_code": "",
        "notes": "",
        "payment_method": "cash_on_delivery"
    })
}
