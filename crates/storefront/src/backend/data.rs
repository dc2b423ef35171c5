//! Data API client (anon key).
//!
//! Speaks the platform's PostgREST-style JSON interface. Catalog reads are
//! cached with `moka` (5-minute TTL); order writes are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use medina_core::tables::{NewOrderItemRow, NewOrderRow, OrderRow, OrderWithItems, ProductRow};
use medina_core::{ProductId, UserId};

use crate::config::BackendConfig;

use super::{BackendError, error_from_response};

/// Filter options for product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
}

impl ProductFilter {
    fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }
}

/// Client for the platform's data API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct DataClient {
    inner: Arc<DataClientInner>,
}

struct DataClientInner {
    client: reqwest::Client,
    rest_base: Url,
    api_key: String,
    product_cache: Cache<String, Vec<ProductRow>>,
}

impl DataClient {
    /// Create a new data API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL cannot be parsed.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let rest_base = Url::parse(&config.url)?.join("rest/v1/")?;

        let product_cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(DataClientInner {
                client: reqwest::Client::new(),
                rest_base,
                api_key: config.api_key.expose_secret().to_string(),
                product_cache,
            }),
        })
    }

    /// Build a request against a table, with the anon key attached.
    ///
    /// When `access_token` is given it becomes the bearer credential so the
    /// platform applies that user's row-level rules; otherwise the anon key
    /// doubles as the bearer.
    fn request(
        &self,
        method: reqwest::Method,
        table: &str,
        access_token: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, BackendError> {
        let url = self.inner.rest_base.join(table)?;
        let bearer = access_token.unwrap_or(&self.inner.api_key);

        Ok(self
            .inner
            .client
            .request(method, url)
            .header("apikey", &self.inner.api_key)
            .bearer_auth(bearer))
    }

    /// Send a request and parse the JSON response body.
    async fn execute<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        // Read as text first for better diagnostics on malformed payloads.
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
    // Products
    // =========================================================================

    /// List products, newest first.
    ///
    /// Unfiltered listings are cached; filtered ones always hit the platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductRow>, BackendError> {
        const CACHE_KEY: &str = "products:all";

        if filter.is_empty()
            && let Some(products) = self.inner.product_cache.get(CACHE_KEY).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut request = self
            .request(reqwest::Method::GET, "products", None)?
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        if let Some(category) = &filter.category {
            request = request.query(&[("category", format!("eq.{category}"))]);
        }
        if let Some(search) = &filter.search {
            request = request.query(&[("name", format!("ilike.*{search}*"))]);
        }

        let products: Vec<ProductRow> = Self::execute(request).await?;

        if filter.is_empty() {
            self.inner
                .product_cache
                .insert(CACHE_KEY.to_string(), products.clone())
                .await;
        }

        Ok(products)
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if no such product exists.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<ProductRow, BackendError> {
        let request = self
            .request(reqwest::Method::GET, "products", None)?
            .query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{product_id}")),
                ("limit", "1".to_string()),
            ]);

        let mut rows: Vec<ProductRow> = Self::execute(request).await?;
        rows.pop()
            .ok_or_else(|| BackendError::NotFound(format!("Product not found: {product_id}")))
    }

    // =========================================================================
    // Orders (not cached - mutable state)
    // =========================================================================

    /// Insert one order row and return it with its server-assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or the response is malformed.
    #[instrument(skip_all, fields(customer = %order.customer_email))]
    pub async fn insert_order(
        &self,
        order: &NewOrderRow,
        access_token: Option<&str>,
    ) -> Result<OrderRow, BackendError> {
        let request = self
            .request(reqwest::Method::POST, "orders", access_token)?
            .header("Prefer", "return=representation")
            .json(order);

        let mut rows: Vec<OrderRow> = Self::execute(request).await?;
        rows.pop().ok_or_else(|| {
            BackendError::NotFound("order insert returned no representation".to_string())
        })
    }

    /// Insert all line-item rows for an order in a single batch.
    ///
    /// Must only be called after [`Self::insert_order`] has returned the
    /// order ID these rows reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip_all, fields(count = items.len()))]
    pub async fn insert_order_items(
        &self,
        items: &[NewOrderItemRow],
        access_token: Option<&str>,
    ) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST, "order_items", access_token)?
            .header("Prefer", "return=minimal")
            .json(&items)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    /// Fetch a user's orders with embedded line items, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, access_token), fields(user_id = %user_id))]
    pub async fn orders_for_user(
        &self,
        user_id: UserId,
        access_token: &str,
    ) -> Result<Vec<OrderWithItems>, BackendError> {
        let request = self
            .request(reqwest::Method::GET, "orders", Some(access_token))?
            .query(&[
                ("select", "*,order_items(*)".to_string()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".to_string()),
            ]);

        Self::execute(request).await
    }

    /// Readiness probe: any authenticated answer from the REST root counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is unreachable or rejects the key.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .get(self.inner.rest_base.clone())
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}
