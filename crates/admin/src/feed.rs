//! Order-insert subscription feed.
//!
//! The platform exposes new rows only by query, so the feed is a polling
//! task that watches `orders` past a `created_at` cursor and publishes each
//! new row into a broadcast channel. Consumers hold a receiver; dropping
//! the [`OrderInsertFeed`] aborts the task, which is the unsubscribe.
//!
//! One feed per process. A poll failure is logged and retried on the next
//! tick; rows are never skipped because the cursor only advances past rows
//! that were actually published.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use medina_core::tables::OrderRow;

use crate::backend::AdminDataClient;

/// Capacity of the broadcast channel; a lagging consumer loses the oldest
/// events rather than stalling the feed.
const CHANNEL_CAPACITY: usize = 64;

/// Handle to the running order-insert subscription.
///
/// Dropping it tears the subscription down.
pub struct OrderInsertFeed {
    sender: broadcast::Sender<OrderRow>,
    task: JoinHandle<()>,
}

impl OrderInsertFeed {
    /// Start polling for orders inserted after `cursor`.
    ///
    /// The cursor should be the `created_at` of the newest row the caller
    /// has already seen (or "now" to watch from startup).
    #[must_use]
    pub fn spawn(
        data: AdminDataClient,
        poll_interval: std::time::Duration,
        cursor: DateTime<Utc>,
    ) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(poll_loop(data, sender.clone(), poll_interval, cursor));

        Self { sender, task }
    }

    /// Subscribe to insert events.
    ///
    /// Each receiver sees every event published after it subscribed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OrderRow> {
        self.sender.subscribe()
    }
}

impl Drop for OrderInsertFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop(
    data: AdminDataClient,
    sender: broadcast::Sender<OrderRow>,
    poll_interval: std::time::Duration,
    mut cursor: DateTime<Utc>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; skip it so spawn-then-insert tests
    // and startup don't race the seed query.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match data.orders_inserted_after(cursor).await {
            Ok(rows) => {
                for row in rows {
                    if row.created_at > cursor {
                        cursor = row.created_at;
                    }
                    debug!(order_id = %row.id, "Order insert event");
                    // Send fails only when no receiver is attached; the
                    // cursor has advanced either way, matching a dropped
                    // subscription.
                    let _ = sender.send(row);
                }
            }
            Err(e) => {
                warn!("Order feed poll failed, will retry: {e}");
            }
        }
    }
}
