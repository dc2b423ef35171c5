//! Admin-only wire payloads.
//!
//! Shared table rows live in [`medina_core::tables`]; these are the write
//! payloads only the admin surface uses.

use serde::{Deserialize, Serialize};

use medina_core::{Money, UserId};

/// Insert payload for `products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProductRow {
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
}

/// Partial update payload for `products`; absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    // Nullable columns use a double Option: the outer level distinguishes
    // "leave alone" from "set" (including set-to-null).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Option<Money>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_on_sale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
}

/// A row of the `user_roles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleRow {
    pub user_id: UserId,
    pub role: String,
}
