//! Clients for the hosted data platform.
//!
//! # Architecture
//!
//! - The platform is source of truth - NO local database, direct API calls
//! - `data` - PostgREST-style JSON data API (`/rest/v1/{table}`)
//! - `auth` - password auth API (`/auth/v1/...`)
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//!
//! The storefront holds the anon key. Requests made on behalf of a signed-in
//! customer attach that customer's access token as the bearer credential so
//! the platform's row-level rules apply; everything else rides on the anon
//! key alone.
//!
//! # Example
//!
//! ```rust,ignore
//! use medina_storefront::backend::DataClient;
//!
//! let data = DataClient::new(&config.backend)?;
//! let products = data.list_products(&ProductFilter::default()).await?;
//! ```

pub mod auth;
pub mod data;
pub mod types;

pub use auth::AuthClient;
pub use data::{DataClient, ProductFilter};

use thiserror::Error;

/// Errors that can occur when talking to the hosted platform.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Auth: wrong email or password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Auth: the email is already registered.
    #[error("Email already registered")]
    EmailTaken,

    /// The configured base URL is not a valid URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Shape of the platform's JSON error bodies (both REST and auth surfaces).
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    #[serde(alias = "msg", alias = "error_description", alias = "error")]
    message: Option<String>,
}

/// Turn a non-success response into a [`BackendError`].
///
/// Reads the body as text first so malformed error payloads still produce a
/// useful message.
async fn error_from_response(response: reqwest::Response) -> BackendError {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return BackendError::RateLimited(retry_after);
    }

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
