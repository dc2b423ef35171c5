//! Analytics route handler: the full sales breakdowns.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::analytics::{
    CategoryCount, DailySales, StatusCount, StoreStats, TopProduct, category_breakdown,
    sales_by_day, status_breakdown, store_stats, top_products,
};
use crate::state::AppState;

/// How many top products the report carries.
const TOP_PRODUCTS: usize = 10;

/// Full analytics payload.
#[derive(Debug, Serialize)]
pub struct AnalyticsView {
    pub stats: StoreStats,
    pub sales_by_day: Vec<DailySales>,
    pub status_breakdown: Vec<StatusCount>,
    pub category_breakdown: Vec<CategoryCount>,
    pub top_products: Vec<TopProduct>,
}

/// Everything the analytics page charts, in one response.
#[instrument(skip(state, _admin))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsView>> {
    let orders = state.data().list_orders(None).await?;
    let products = state.data().list_products().await?;
    let items = state.data().list_order_items().await?;

    Ok(Json(AnalyticsView {
        stats: store_stats(&orders, products.len()),
        sales_by_day: sales_by_day(&orders),
        status_breakdown: status_breakdown(&orders),
        category_breakdown: category_breakdown(&products),
        top_products: top_products(&items, TOP_PRODUCTS),
    }))
}
