//! Admin login against the platform's auth API.
//!
//! Credentials are verified by the platform; whether the account may enter
//! the admin panel is a separate `user_roles` lookup done by the login
//! route with [`super::AdminDataClient::is_admin`].

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use medina_core::{Email, UserId};

use crate::config::BackendConfig;

use super::{BackendError, error_from_response};

/// A verified admin login, before the role check.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLogin {
    pub access_token: String,
    pub user: AdminAuthUser,
}

/// The platform's view of the logging-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAuthUser {
    pub id: UserId,
    pub email: String,
}

#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for admin password login.
#[derive(Clone)]
pub struct AdminAuthClient {
    inner: Arc<AdminAuthClientInner>,
}

struct AdminAuthClientInner {
    client: reqwest::Client,
    auth_base: Url,
    api_key: String,
}

impl AdminAuthClient {
    /// Create a new admin auth client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot be parsed.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            inner: Arc::new(AdminAuthClientInner {
                client: reqwest::Client::new(),
                auth_base: Url::parse(&config.url)?.join("auth/v1/")?,
                api_key: config.service_key.expose_secret().to_string(),
            }),
        })
    }

    /// Verify email + password.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidCredentials` on a rejected login.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<AdminLogin, BackendError> {
        let mut url = self.inner.auth_base.join("token")?;
        url.set_query(Some("grant_type=password"));

        let response = self
            .inner
            .client
            .post(url)
            .header("apikey", &self.inner.api_key)
            .json(&PasswordGrantRequest {
                email: email.as_str(),
                password,
            })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(BackendError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }
}
