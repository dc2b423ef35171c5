//! Cart route handlers.
//!
//! The cart is session state: every handler loads it from the tower-session,
//! mutates it in memory, and writes it back. All cart operations are total -
//! the only failure modes are session I/O and an unknown product on add.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use medina_core::{Cart, CartLine, CartProduct, Money, ProductId};

use crate::error::Result;
use crate::models::session_keys;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub size: Option<String>,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub image_url: Option<String>,
}

/// Cart display data with its derived values.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub count: u32,
    pub subtotal: Money,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            count: cart.count(),
            subtotal: cart.subtotal(),
        }
    }
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.product_id,
            name: line.product.name.clone(),
            size: line.product.size.clone(),
            quantity: line.quantity,
            unit_price: line.product.unit_price,
            line_total: line.line_total(),
            image_url: line.product.image_url.clone(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session's cart, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back into the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub size: Option<String>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub delta: i64,
}

/// Remove line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub size: Option<String>,
}

/// Cart count badge payload.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(&cart)))
}

/// Add a product to the cart.
///
/// Fetches the product from the platform so the line carries a price/name
/// snapshot taken now, not whatever the catalog says later. Lines merge on
/// `(product, size)`.
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state.data().get_product(request.product_id).await?;

    let mut cart = load_cart(&session).await?;
    cart.add(
        CartProduct {
            product_id: product.id,
            name: product.name,
            unit_price: product.price,
            image_url: product.image_url,
            size: request.size,
        },
        request.quantity.unwrap_or(1),
    );
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Adjust a line's quantity by a signed delta.
///
/// Quantity clamps at zero; a line reaching zero is removed.
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(request.product_id, request.size.as_deref(), request.delta);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line unconditionally.
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(request.product_id, request.size.as_deref());
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount {
        count: cart.count(),
    }))
}
