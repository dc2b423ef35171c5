//! Authentication extractors for storefront handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::backend::types::AuthSession;
use crate::models::session_keys;

/// Extractor that requires a signed-in customer.
///
/// Rejects with 401 when the session carries no platform token.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireCustomer(customer): RequireCustomer) -> impl IntoResponse {
///     format!("orders for {}", customer.user.email)
/// }
/// ```
pub struct RequireCustomer(pub AuthSession);

/// Rejection for [`RequireCustomer`].
pub struct CustomerAuthRejection;

impl IntoResponse for CustomerAuthRejection {
    fn into_response(self) -> Response {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = CustomerAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(CustomerAuthRejection)?;

        let customer: AuthSession = session
            .get(session_keys::CUSTOMER)
            .await
            .ok()
            .flatten()
            .ok_or(CustomerAuthRejection)?;

        Ok(Self(customer))
    }
}

/// Extractor that optionally gets the current customer.
///
/// Unlike [`RequireCustomer`], never rejects the request.
pub struct OptionalCustomer(pub Option<AuthSession>);

impl<S> FromRequestParts<S> for OptionalCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let customer = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<AuthSession>(session_keys::CUSTOMER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(customer))
    }
}
