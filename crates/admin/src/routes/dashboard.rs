//! Dashboard route handler: headline stats plus the latest orders.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::analytics::{StoreStats, store_stats};
use crate::state::AppState;

use super::orders::AdminOrderView;

/// How many orders the dashboard previews.
const RECENT_ORDERS: usize = 5;

/// Dashboard payload.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub stats: StoreStats,
    pub recent_orders: Vec<AdminOrderView>,
    pub unread_notifications: usize,
}

/// Headline stats and the most recent orders.
#[instrument(skip(state, _admin))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<DashboardView>> {
    let orders = state.data().list_orders(None).await?;
    let products = state.data().list_products().await?;

    let stats = store_stats(&orders, products.len());
    let recent_orders = orders
        .into_iter()
        .take(RECENT_ORDERS)
        .map(AdminOrderView::from)
        .collect();

    Ok(Json(DashboardView {
        stats,
        recent_orders,
        unread_notifications: state.notifications().unread_count(),
    }))
}
