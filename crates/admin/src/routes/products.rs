//! Product management route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::instrument;

use medina_core::ProductId;
use medina_core::tables::ProductRow;

use crate::backend::types::{NewProductRow, ProductPatch};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Largest accepted product image (5 MiB).
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// All products, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductRow>>> {
    Ok(Json(state.data().list_products().await?))
}

/// Create a product.
#[instrument(skip(state, _admin), fields(name = %product.name))]
pub async fn create(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Json(product): Json<NewProductRow>,
) -> Result<(StatusCode, Json<ProductRow>)> {
    if product.name.trim().is_empty() {
        return Err(AppError::BadRequest("Product name is required".to_string()));
    }
    if product.price.amount() < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Price cannot be negative".to_string(),
        ));
    }

    let created = state.data().insert_product(&product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update a product.
#[instrument(skip(state, _admin, patch), fields(product_id = %id))]
pub async fn update(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductRow>> {
    if let Some(price) = &patch.price
        && price.amount() < Decimal::ZERO
    {
        return Err(AppError::BadRequest(
            "Price cannot be negative".to_string(),
        ));
    }

    Ok(Json(state.data().update_product(id, &patch).await?))
}

/// Delete a product.
///
/// Past order line items are unaffected: they carry their own name/price
/// snapshots and only a nullable product reference.
#[instrument(skip(state, _admin), fields(product_id = %id))]
pub async fn remove(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>> {
    state.data().delete_product(id).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// Upload a product image.
///
/// Takes the first multipart file field, stores it under a generated path
/// in platform storage, and points the product's `image_url` at the public
/// URL.
#[instrument(skip(state, _admin, multipart), fields(product_id = %id))]
pub async fn upload_image(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    mut multipart: Multipart,
) -> Result<Json<ProductRow>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
        .ok_or_else(|| AppError::BadRequest("No file in upload".to_string()))?;

    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "Expected an image upload, got {content_type}"
        )));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(format!(
            "Image too large ({} bytes, max {MAX_IMAGE_BYTES})",
            bytes.len()
        )));
    }

    let stored = state
        .storage()
        .upload_product_image(bytes.to_vec(), &content_type)
        .await?;

    let patch = ProductPatch {
        image_url: Some(Some(stored.public_url)),
        ..ProductPatch::default()
    };
    Ok(Json(state.data().update_product(id, &patch).await?))
}
