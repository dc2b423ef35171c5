//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use medina_core::tables::ProductRow;
use medina_core::{Money, ProductId};

use crate::backend::ProductFilter;
use crate::error::Result;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub original_price: Option<Money>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_new: bool,
    pub is_on_sale: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductView {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            original_price: row.original_price,
            image_url: row.image_url,
            category: row.category,
            description: row.description,
            is_new: row.is_new,
            is_on_sale: row.is_on_sale,
            in_stock: row.stock > 0,
            created_at: row.created_at,
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Exact category match.
    pub category: Option<String>,
    /// Free-text name search.
    pub q: Option<String>,
}

/// Product listing, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let filter = ProductFilter {
        category: query.category.filter(|c| !c.is_empty()),
        search: query.q.filter(|q| !q.is_empty()),
    };

    let products = state.data().list_products(&filter).await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = state.data().get_product(id).await?;
    Ok(Json(ProductView::from(product)))
}
