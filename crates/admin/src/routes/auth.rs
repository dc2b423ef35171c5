//! Admin authentication route handlers.
//!
//! Login is two gates: the platform verifies the credentials, then the
//! `user_roles` table decides whether the account is an admin at all.
//! Non-admin accounts get a 403 and no session.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use medina_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in as an admin.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let email = Email::parse(request.email.trim())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let login = state.auth().sign_in(&email, &request.password).await?;

    if !state.data().is_admin(login.user.id).await? {
        tracing::warn!(user_id = %login.user.id, "Login without admin role rejected");
        return Err(AppError::Forbidden(
            "This account has no admin access".to_string(),
        ));
    }

    let admin = CurrentAdmin {
        user_id: login.user.id,
        email: login.user.email,
    };
    session.insert(session_keys::CURRENT_ADMIN, &admin).await?;

    Ok(Json(admin))
}

/// Sign out.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(Json(serde_json::json!({ "signed_out": true })))
}

/// The current admin.
#[instrument(skip_all)]
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
