//! Customer authentication route handlers.
//!
//! All credential checks happen on the platform's auth API; the storefront
//! just keeps the issued access token in the session.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use medina_core::Email;

use crate::backend::types::AuthUser;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireCustomer;
use crate::models::session_keys;
use crate::state::AppState;

/// Minimum password length accepted at registration.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for register/login/me.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub user: AuthUser,
    /// True when the platform still wants an email confirmation before
    /// issuing a session.
    pub requires_confirmation: bool,
}

/// Create an account.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<CustomerResponse>> {
    let email = Email::parse(request.email.trim())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let outcome = state
        .auth()
        .sign_up(&email, &request.password, request.full_name)
        .await?;

    let requires_confirmation = outcome.session.is_none();
    if let Some(auth_session) = outcome.session {
        set_sentry_user(&auth_session.user.id, Some(&auth_session.user.email));
        session
            .insert(session_keys::CUSTOMER, &auth_session)
            .await?;
    }

    Ok(Json(CustomerResponse {
        user: outcome.user,
        requires_confirmation,
    }))
}

/// Sign in.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CustomerResponse>> {
    let email = Email::parse(request.email.trim())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let auth_session = state.auth().sign_in(&email, &request.password).await?;

    set_sentry_user(&auth_session.user.id, Some(&auth_session.user.email));
    session
        .insert(session_keys::CUSTOMER, &auth_session)
        .await?;

    Ok(Json(CustomerResponse {
        user: auth_session.user,
        requires_confirmation: false,
    }))
}

/// Sign out.
///
/// The platform token is revoked best-effort; the session entry goes away
/// regardless. The cart survives logout.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<serde_json::Value>> {
    if let Some(customer) = session
        .remove::<crate::backend::types::AuthSession>(session_keys::CUSTOMER)
        .await?
        && let Err(e) = state.auth().sign_out(&customer.access_token).await
    {
        tracing::warn!("Token revocation failed during logout: {e}");
    }

    clear_sentry_user();
    Ok(Json(serde_json::json!({ "signed_out": true })))
}

/// The current customer.
///
/// Re-validates the stored token against the platform, so a revoked or
/// expired token reads as signed out rather than serving stale identity.
#[instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<CustomerResponse>> {
    let user = state
        .auth()
        .current_user(&customer.access_token)
        .await
        .map_err(|_| AppError::Unauthorized("Session expired".to_string()))?;

    Ok(Json(CustomerResponse {
        user,
        requires_confirmation: false,
    }))
}
