//! Customer order history.
//!
//! Read-only: customers can see their orders but never mutate them.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use medina_core::tables::{OrderItemRow, OrderWithItems};
use medina_core::{Money, OrderId, OrderStatus};

use crate::error::Result;
use crate::middleware::RequireCustomer;
use crate::state::AppState;

/// One order in the customer's history.
#[derive(Debug, Clone, Serialize)]
pub struct OrderHistoryView {
    pub id: OrderId,
    /// Short reference shown to the customer.
    pub reference: String,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub shipping_address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderHistoryItemView>,
}

/// One line of a historical order - the snapshot taken at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct OrderHistoryItemView {
    pub product_name: String,
    pub product_price: Money,
    pub quantity: u32,
    pub size: Option<String>,
    pub line_total: Money,
}

impl From<OrderWithItems> for OrderHistoryView {
    fn from(row: OrderWithItems) -> Self {
        Self {
            id: row.order.id,
            reference: row.order.id.short(),
            status: row.order.status,
            total_amount: row.order.total_amount,
            shipping_address: row.order.shipping_address,
            city: row.order.city,
            created_at: row.order.created_at,
            items: row
                .order_items
                .into_iter()
                .map(OrderHistoryItemView::from)
                .collect(),
        }
    }
}

impl From<OrderItemRow> for OrderHistoryItemView {
    fn from(item: OrderItemRow) -> Self {
        let line_total = item.product_price.mul_quantity(item.quantity);
        Self {
            product_name: item.product_name,
            product_price: item.product_price,
            quantity: item.quantity,
            size: item.size,
            line_total,
        }
    }
}

/// The signed-in customer's orders, newest first.
#[instrument(skip(state, customer))]
pub async fn index(
    State(state): State<AppState>,
    RequireCustomer(customer): RequireCustomer,
) -> Result<Json<Vec<OrderHistoryView>>> {
    let orders = state
        .data()
        .orders_for_user(customer.user.id, &customer.access_token)
        .await?;

    Ok(Json(
        orders.into_iter().map(OrderHistoryView::from).collect(),
    ))
}
