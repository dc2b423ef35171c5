//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{AuthClient, BackendError, DataClient};
use crate::config::StorefrontConfig;
use crate::services::CheckoutService;

/// Application state shared across all handlers.
///
/// Created once at startup and never torn down during the process lifetime.
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    data: DataClient,
    auth: AuthClient,
    checkout: CheckoutService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL in the configuration is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, BackendError> {
        let data = DataClient::new(&config.backend)?;
        let auth = AuthClient::new(&config.backend)?;
        let checkout = CheckoutService::new(config.checkout.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                data,
                auth,
                checkout,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the platform data API client.
    #[must_use]
    pub fn data(&self) -> &DataClient {
        &self.inner.data
    }

    /// Get a reference to the platform auth API client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}
