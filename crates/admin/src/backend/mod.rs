//! Service-role clients for the hosted data platform.
//!
//! The admin binary talks to the same platform as the storefront but with
//! the service-role key, which bypasses row-level rules. That is what lets
//! it see every order and mutate the catalog - and why this binary stays on
//! the internal network.
//!
//! - `data` - full-table access to `orders`, `order_items`, `products`,
//!   and `user_roles`
//! - `auth` - password login for admin users (the role check happens in
//!   `data`, against `user_roles`)
//! - `storage` - product image uploads

pub mod auth;
pub mod data;
pub mod storage;
pub mod types;

pub use auth::AdminAuthClient;
pub use data::AdminDataClient;
pub use storage::StorageClient;

use thiserror::Error;

/// Errors from the platform APIs.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the platform.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Auth: wrong email or password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The configured base URL is not a valid URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(alias = "msg", alias = "error_description", alias = "error")]
    message: Option<String>,
}

/// Turn a non-success response into a [`BackendError`].
async fn error_from_response(response: reqwest::Response) -> BackendError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.chars().take(200).collect());

    tracing::debug!(status = %status, message = %message, "Platform API error");

    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}
