//! Checkout route handlers.
//!
//! The state machine (editing -> submitting -> succeeded | failed) is the
//! lifecycle of one `POST /checkout`: a rejected submit leaves the caller
//! editing with field messages, a backend failure reports `failed` with the
//! cart intact, and success clears the session cart and returns the order
//! reference.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalCustomer;
use crate::services::checkout::{CheckoutError, CheckoutForm, PlacedOrder, Quote};
use crate::state::AppState;

use super::cart::{load_cart, save_cart};

/// Price preview for the current cart.
///
/// Guarded like the checkout page itself: an empty cart is not enterable.
#[instrument(skip(state, session))]
pub async fn quote(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(empty_cart_response());
    }

    let quote: Quote = state.checkout().quote(&cart);
    Ok(Json(quote).into_response())
}

/// Place the order.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    OptionalCustomer(customer): OptionalCustomer,
    Json(form): Json<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;

    let customer_ref = customer
        .as_ref()
        .map(|c| (c.user.id, c.access_token.as_str()));

    let placed: PlacedOrder = match state
        .checkout()
        .place_order(state.data(), &cart, &form, customer_ref)
        .await
    {
        Ok(placed) => placed,
        Err(err) => return Ok(rejection_response(&err)),
    };

    // Success: only now does the cart empty.
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok((StatusCode::CREATED, Json(placed)).into_response())
}

fn empty_cart_response() -> Response {
    (
        StatusCode::CONFLICT,
        Json(json!({ "error": "cart_is_empty" })),
    )
        .into_response()
}

/// Map a checkout rejection onto the wire.
///
/// Validation stays field-level; backend failures collapse to one generic
/// retry message with the detail kept server-side.
fn rejection_response(err: &CheckoutError) -> Response {
    match err {
        CheckoutError::EmptyCart => empty_cart_response(),
        CheckoutError::Invalid(fields) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "validation_failed", "fields": fields })),
        )
            .into_response(),
        CheckoutError::Backend(_) | CheckoutError::OrphanedOrder { .. } => {
            let event_id = sentry::capture_error(err);
            tracing::error!(
                error = %err,
                sentry_event_id = %event_id,
                "Checkout submission failed"
            );
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "Failed to place order. Please try again." })),
            )
                .into_response()
        }
    }
}
