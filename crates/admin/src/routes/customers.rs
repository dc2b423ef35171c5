//! Customer overview route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::customers::{CustomerSummary, summarize_customers};
use crate::state::AppState;

/// Query parameters.
#[derive(Debug, Deserialize)]
pub struct CustomersQuery {
    /// Free-text filter on name and email.
    pub q: Option<String>,
}

/// Customers derived from the orders table, biggest spender first.
#[instrument(skip(state, _admin))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<CustomersQuery>,
) -> Result<Json<Vec<CustomerSummary>>> {
    let orders = state.data().list_orders(None).await?;
    let customers = summarize_customers(
        &orders,
        query.q.as_deref().filter(|q| !q.is_empty()),
    );

    Ok(Json(customers))
}
