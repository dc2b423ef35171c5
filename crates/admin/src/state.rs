//! Application state shared across handlers.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::warn;

use crate::backend::{AdminAuthClient, AdminDataClient, BackendError, StorageClient};
use crate::config::AdminConfig;
use crate::feed::OrderInsertFeed;
use crate::notifications::NotificationCenter;

/// Application state shared across all handlers.
///
/// Created once at startup and never torn down during the process lifetime.
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    data: AdminDataClient,
    auth: AdminAuthClient,
    storage: StorageClient,
    notifications: NotificationCenter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend URL in the configuration is invalid.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let data = AdminDataClient::new(&config.backend)?;
        let auth = AdminAuthClient::new(&config.backend)?;
        let storage = StorageClient::new(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                data,
                auth,
                storage,
                notifications: NotificationCenter::new(),
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the service-role data client.
    #[must_use]
    pub fn data(&self) -> &AdminDataClient {
        &self.inner.data
    }

    /// Get a reference to the admin auth client.
    #[must_use]
    pub fn auth(&self) -> &AdminAuthClient {
        &self.inner.auth
    }

    /// Get a reference to the storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }

    /// Get a reference to the notification center.
    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    /// Seed the notification center and start the order-insert feed.
    ///
    /// Returns the feed handle; dropping it unsubscribes, so the caller
    /// keeps it alive for the process lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed query fails. The feed itself retries
    /// its polls internally and never errors out.
    pub async fn start_order_feed(&self) -> Result<OrderInsertFeed, BackendError> {
        // Newest-first; the first row's timestamp becomes the feed cursor so
        // nothing between seed and first poll is missed or duplicated.
        let recent = self.data().recent_orders(10).await?;
        self.notifications().seed(&recent);

        let cursor = recent.first().map_or_else(Utc::now, |o| o.created_at);
        let feed = OrderInsertFeed::spawn(
            self.data().clone(),
            self.config().order_feed_poll_interval,
            cursor,
        );

        // Consumer task: append every insert event to the notification
        // center. Ends when the feed handle is dropped.
        let mut receiver = feed.subscribe();
        let notifications = self.notifications().clone();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(order) => notifications.record_insert(&order),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Notification consumer lagged, skipped {skipped} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(feed)
    }
}
