//! Order management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use medina_core::tables::{OrderItemRow, OrderRow, OrderWithItems};
use medina_core::{Money, OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// One order in the admin list.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderView {
    pub id: OrderId,
    pub reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<OrderRow> for AdminOrderView {
    fn from(row: OrderRow) -> Self {
        Self {
            reference: row.id.short(),
            id: row.id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            shipping_address: row.shipping_address,
            city: row.city,
            postal_code: row.postal_code,
            total_amount: row.total_amount,
            notes: row.notes,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Order detail: the order plus its line items.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderDetail {
    #[serde(flatten)]
    pub order: AdminOrderView,
    pub items: Vec<OrderItemRow>,
}

impl From<OrderWithItems> for AdminOrderDetail {
    fn from(row: OrderWithItems) -> Self {
        Self {
            order: AdminOrderView::from(row.order),
            items: row.order_items,
        }
    }
}

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    /// Status filter, e.g. `pending`.
    pub status: Option<String>,
    /// Free-text match on customer name, email, or the short reference.
    pub q: Option<String>,
}

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: OrderStatus,
}

/// All orders, newest first, filtered.
///
/// The status filter is pushed to the platform; the free-text match runs
/// in-process over the returned rows.
#[instrument(skip(state, _admin))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<AdminOrderView>>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let mut orders = state.data().list_orders(status).await?;

    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        orders.retain(|o| {
            o.customer_name.to_lowercase().contains(&needle)
                || o.customer_email.to_lowercase().contains(&needle)
                || o.id.short().to_lowercase().contains(&needle)
        });
    }

    Ok(Json(orders.into_iter().map(AdminOrderView::from).collect()))
}

/// One order with its line items.
#[instrument(skip(state, _admin), fields(order_id = %id))]
pub async fn show(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<AdminOrderDetail>> {
    let order = state.data().get_order(id).await?;
    Ok(Json(AdminOrderDetail::from(order)))
}

/// Change an order's status.
///
/// One PATCH per change; the response carries the updated row so the UI
/// reflects it immediately. The matching bell notification counts as read
/// from here on (its order is no longer pending).
#[instrument(skip(state, _admin), fields(order_id = %id, status = %request.status))]
pub async fn update_status(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<AdminOrderView>> {
    let updated = state.data().update_order_status(id, request.status).await?;

    // Keep the bell consistent with the table without a refetch.
    if request.status != OrderStatus::Pending {
        state.notifications().mark_read(id);
    }

    Ok(Json(AdminOrderView::from(updated)))
}
