//! Service-role data API client.
//!
//! No read caching here: admins expect to see the row they just changed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use medina_core::tables::{OrderItemRow, OrderRow, OrderWithItems, ProductRow};
use medina_core::{OrderId, OrderStatus, ProductId, UserId};

use crate::config::BackendConfig;

use super::types::{NewProductRow, ProductPatch, UserRoleRow};
use super::{BackendError, error_from_response};

/// Role name that unlocks the admin panel.
pub const ADMIN_ROLE: &str = "admin";

/// Client for the platform's data API with the service-role key.
#[derive(Clone)]
pub struct AdminDataClient {
    inner: Arc<AdminDataClientInner>,
}

struct AdminDataClientInner {
    client: reqwest::Client,
    rest_base: Url,
    service_key: String,
}

impl AdminDataClient {
    /// Create a new service-role data client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot be parsed.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            inner: Arc::new(AdminDataClientInner {
                client: reqwest::Client::new(),
                rest_base: Url::parse(&config.url)?.join("rest/v1/")?,
                service_key: config.service_key.expose_secret().to_string(),
            }),
        })
    }

    fn request(
        &self,
        method: reqwest::Method,
        table: &str,
    ) -> Result<reqwest::RequestBuilder, BackendError> {
        let url = self.inner.rest_base.join(table)?;
        Ok(self
            .inner
            .client
            .request(method, url)
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key))
    }

    async fn execute<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse platform response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// All orders, newest first, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderRow>, BackendError> {
        let mut request = self
            .request(reqwest::Method::GET, "orders")?
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        if let Some(status) = status {
            request = request.query(&[("status", format!("eq.{status}"))]);
        }

        Self::execute(request).await
    }

    /// The most recent orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn recent_orders(&self, limit: usize) -> Result<Vec<OrderRow>, BackendError> {
        let request = self.request(reqwest::Method::GET, "orders")?.query(&[
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ]);

        Self::execute(request).await
    }

    /// Orders inserted strictly after `cursor`, oldest first.
    ///
    /// This is the polling primitive behind the insert feed: callers advance
    /// their cursor to the last row's `created_at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders_inserted_after(
        &self,
        cursor: DateTime<Utc>,
    ) -> Result<Vec<OrderRow>, BackendError> {
        let request = self.request(reqwest::Method::GET, "orders")?.query(&[
            ("select", "*".to_string()),
            ("created_at", format!("gt.{}", cursor.to_rfc3339())),
            ("order", "created_at.asc".to_string()),
        ]);

        Self::execute(request).await
    }

    /// One order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such order exists.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<OrderWithItems, BackendError> {
        let request = self.request(reqwest::Method::GET, "orders")?.query(&[
            ("select", "*,order_items(*)".to_string()),
            ("id", format!("eq.{order_id}")),
            ("limit", "1".to_string()),
        ]);

        let mut rows: Vec<OrderWithItems> = Self::execute(request).await?;
        rows.pop()
            .ok_or_else(|| BackendError::NotFound(format!("Order not found: {order_id}")))
    }

    /// Update one order's status and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such order exists.
    #[instrument(skip(self), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderRow, BackendError> {
        let request = self
            .request(reqwest::Method::PATCH, "orders")?
            .query(&[("id", format!("eq.{order_id}"))])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "status": status }));

        let mut rows: Vec<OrderRow> = Self::execute(request).await?;
        rows.pop()
            .ok_or_else(|| BackendError::NotFound(format!("Order not found: {order_id}")))
    }

    /// Every line item in the store's history.
    ///
    /// Feeds the top-products aggregation; the table stays small enough for
    /// in-process grouping at this store's scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_order_items(&self) -> Result<Vec<OrderItemRow>, BackendError> {
        let request = self
            .request(reqwest::Method::GET, "order_items")?
            .query(&[("select", "*")]);

        Self::execute(request).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductRow>, BackendError> {
        let request = self
            .request(reqwest::Method::GET, "products")?
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        Self::execute(request).await
    }

    /// Insert a product and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip_all, fields(name = %product.name))]
    pub async fn insert_product(&self, product: &NewProductRow) -> Result<ProductRow, BackendError> {
        let request = self
            .request(reqwest::Method::POST, "products")?
            .header("Prefer", "return=representation")
            .json(product);

        let mut rows: Vec<ProductRow> = Self::execute(request).await?;
        rows.pop().ok_or_else(|| {
            BackendError::NotFound("product insert returned no representation".to_string())
        })
    }

    /// Apply a partial update to a product and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such product exists.
    #[instrument(skip(self, patch), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> Result<ProductRow, BackendError> {
        let request = self
            .request(reqwest::Method::PATCH, "products")?
            .query(&[("id", format!("eq.{product_id}"))])
            .header("Prefer", "return=representation")
            .json(patch);

        let mut rows: Vec<ProductRow> = Self::execute(request).await?;
        rows.pop()
            .ok_or_else(|| BackendError::NotFound(format!("Product not found: {product_id}")))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::DELETE, "products")?
            .query(&[("id", format!("eq.{product_id}"))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    // =========================================================================
    // Roles
    // =========================================================================

    /// Whether the user holds the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn is_admin(&self, user_id: UserId) -> Result<bool, BackendError> {
        let request = self.request(reqwest::Method::GET, "user_roles")?.query(&[
            ("select", "user_id,role".to_string()),
            ("user_id", format!("eq.{user_id}")),
            ("role", format!("eq.{ADMIN_ROLE}")),
            ("limit", "1".to_string()),
        ]);

        let rows: Vec<UserRoleRow> = Self::execute(request).await?;
        Ok(!rows.is_empty())
    }

    /// Grant the admin role to a user. Idempotent on the platform side.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn grant_admin(&self, user_id: UserId) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST, "user_roles")?
            .header("Prefer", "resolution=merge-duplicates")
            .json(&UserRoleRow {
                user_id,
                role: ADMIN_ROLE.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    /// Revoke the admin role from a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn revoke_admin(&self, user_id: UserId) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::DELETE, "user_roles")?
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("role", format!("eq.{ADMIN_ROLE}")),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    /// Readiness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is unreachable or rejects the key.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .get(self.inner.rest_base.clone())
            .header("apikey", &self.inner.service_key)
            .bearer_auth(&self.inner.service_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
