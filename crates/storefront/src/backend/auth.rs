//! Auth API client.
//!
//! Wraps the platform's password auth endpoints. The storefront never sees
//! password hashes or refresh logic; it exchanges credentials for an access
//! token and keeps that token in the customer's session.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use medina_core::Email;

use crate::config::BackendConfig;

use super::types::{AuthSession, AuthUser, UserMetadata};
use super::{BackendError, error_from_response};

/// Client for the platform's auth API.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    auth_base: Url,
    api_key: String,
}

/// Outcome of a sign-up attempt.
///
/// The platform may require email confirmation before issuing tokens, in
/// which case `session` is absent and the customer signs in after
/// confirming.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    pub session: Option<AuthSession>,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: UserMetadata,
}

#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

impl AuthClient {
    /// Create a new auth API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot be parsed.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                auth_base: Url::parse(&config.url)?.join("auth/v1/")?,
                api_key: config.api_key.expose_secret().to_string(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.auth_base.join(path)?)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::EmailTaken` if the address is already
    /// registered, or another variant for transport/API failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(
        &self,
        email: &Email,
        password: &str,
        full_name: Option<String>,
    ) -> Result<SignUpOutcome, BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("signup")?)
            .header("apikey", &self.inner.api_key)
            .json(&SignUpRequest {
                email: email.as_str(),
                password,
                data: UserMetadata { full_name },
            })
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || response.status() == reqwest::StatusCode::CONFLICT
        {
            return Err(BackendError::EmailTaken);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        // Two response shapes: with email confirmation pending the user
        // object is the top level; with auto-confirm it is nested next to
        // the issued tokens.
        let body: serde_json::Value = response.json().await?;
        let nested_user = body.get("user").filter(|u| !u.is_null()).cloned();
        let (user_value, access_token) = match nested_user {
            Some(user) => (
                user,
                body.get("access_token")
                    .and_then(|t| t.as_str())
                    .map(String::from),
            ),
            None => (body, None),
        };

        let user: AuthUser = serde_json::from_value(user_value)?;
        let session = access_token.map(|access_token| AuthSession {
            access_token,
            user: user.clone(),
        });

        Ok(SignUpOutcome { user, session })
    }

    /// Exchange email + password for an access token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidCredentials` on a rejected login.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthSession, BackendError> {
        let mut url = self.endpoint("token")?;
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

        let body: TokenResponse = response.json().await?;
        Ok(AuthSession {
            access_token: body.access_token,
            user: body.user,
        })
    }

    /// Look up the user a token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is expired or revoked.
    #[instrument(skip_all)]
    pub async fn current_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("user")?)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Revoke a token server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("logout")?)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        // 401 here just means the token is already dead; the caller is
        // clearing its session either way.
        if !response.status().is_success()
            && response.status() != reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }
}
