//! Wire rows for the platform's tables.
//!
//! Row structs mirror the hosted platform's tables column-for-column; the
//! `New*` structs are insert payloads with server-assigned columns omitted.
//! Both services deserialize the same rows, so they live here rather than in
//! either service crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Money, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

// =============================================================================
// products
// =============================================================================

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub original_price: Option<Money>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default)]
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// orders
// =============================================================================

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    pub user_id: Option<UserId>,
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

/// Insert payload for `orders`. The platform assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderRow {
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping_address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub total_amount: Money,
    pub notes: Option<String>,
    pub status: OrderStatus,
}

// =============================================================================
// order_items
// =============================================================================

/// A row of the `order_items` table.
///
/// Name and price are snapshots taken at checkout, not live product
/// references; the row keeps what the customer actually paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_price: Money,
    pub quantity: u32,
    pub size: Option<String>,
}

/// Insert payload for `order_items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItemRow {
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_price: Money,
    pub quantity: u32,
    pub size: Option<String>,
}

/// An order with its line items embedded (`select=*,order_items(*)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: OrderRow,
    #[serde(default)]
    pub order_items: Vec<OrderItemRow>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_with_items_parses_embedded_select() {
        let json = r#"{
            "id": "11111111-2222-4333-8444-555555555555",
            "user_id": null,
            "customer_name": "Amina K",
            "customer_email": "amina@example.com",
            "customer_phone": null,
            "shipping_address": "12 Rue des Oliviers",
            "city": "Oran",
            "postal_code": null,
            "total_amount": 260,
            "notes": null,
            "status": "pending",
            "created_at": "2026-03-01T10:00:00Z",
            "order_items": [{
                "id": "aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee",
                "order_id": "11111111-2222-4333-8444-555555555555",
                "product_id": null,
                "product_name": "Linen shirt",
                "product_price": 100,
                "quantity": 2,
                "size": "M"
            }]
        }"#;

        let parsed: OrderWithItems = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.order.customer_name, "Amina K");
        assert_eq!(parsed.order.status, OrderStatus::Pending);
        assert_eq!(parsed.order_items.len(), 1);
        assert_eq!(parsed.order_items[0].quantity, 2);
    }

    #[test]
    fn test_order_without_embed_defaults_to_no_items() {
        let json = r#"{
            "id": "11111111-2222-4333-8444-555555555555",
            "user_id": null,
            "customer_name": "Amina K",
            "customer_email": "amina@example.com",
            "customer_phone": null,
            "shipping_address": "12 Rue des Oliviers",
            "city": "Oran",
            "postal_code": null,
            "total_amount": 260,
            "notes": null,
            "status": "shipped",
            "created_at": "2026-03-01T10:00:00Z"
        }"#;

        let parsed: OrderWithItems = serde_json::from_str(json).unwrap();
        assert!(parsed.order_items.is_empty());
        assert_eq!(parsed.order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_new_order_serializes_status_snake_case() {
        let row = NewOrderRow {
            user_id: None,
            customer_name: "A".into(),
            customer_email: "a@b.c".into(),
            customer_phone: None,
            shipping_address: "addr".into(),
            city: "Algiers".into(),
            postal_code: None,
            total_amount: Money::new("110".parse().unwrap()),
            notes: None,
            status: OrderStatus::Pending,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["total_amount"], "110");
    }

    #[test]
    fn test_product_row_defaults_for_flags() {
        let json = r#"{
            "id": "22222222-3333-4444-8555-666666666666",
            "name": "Linen shirt",
            "price": 100,
            "original_price": null,
            "image_url": null,
            "category": "shirts",
            "description": null,
            "created_at": "2026-02-01T09:00:00Z"
        }"#;

        let parsed: ProductRow = serde_json::from_str(json).unwrap();
        assert!(!parsed.is_new);
        assert!(!parsed.is_on_sale);
        assert_eq!(parsed.stock, 0);
    }
}
