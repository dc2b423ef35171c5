//! New-order notification center.
//!
//! In-process state behind the bell icon: the latest orders as a capped
//! list of notifications with unread flags. Seeded at startup from the
//! newest rows (unread = still pending), then fed by the insert
//! subscription. Read state is local and never persisted; restarting the
//! admin service resets it.

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use medina_core::tables::OrderRow;
use medina_core::{OrderId, OrderStatus};

/// How many notifications the bell keeps.
const CAPACITY: usize = 10;

/// One entry in the notification dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// The order this notification is about.
    pub order_id: OrderId,
    /// Short reference for display.
    pub reference: String,
    /// e.g. "New order from Amina K - $260.00"
    pub message: String,
    pub time: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    fn from_row(order: &OrderRow, read: bool) -> Self {
        Self {
            order_id: order.id,
            reference: order.id.short(),
            message: format!(
                "New order from {} - {}",
                order.customer_name, order.total_amount
            ),
            time: order.created_at,
            read,
        }
    }
}

/// Shared notification state, newest first, capped at [`CAPACITY`].
#[derive(Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<RwLock<VecDeque<Notification>>>,
}

impl NotificationCenter {
    /// Create an empty notification center.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the newest orders (newest first, as `recent_orders`
    /// returns them). An order counts as read once it is no longer pending.
    pub fn seed(&self, orders: &[OrderRow]) {
        let mut entries = self.write();
        entries.clear();
        for order in orders.iter().take(CAPACITY) {
            entries.push_back(Notification::from_row(
                order,
                order.status != OrderStatus::Pending,
            ));
        }
    }

    /// Record a freshly inserted order: prepend unread, drop the oldest
    /// entry past capacity.
    pub fn record_insert(&self, order: &OrderRow) {
        let mut entries = self.write();
        entries.push_front(Notification::from_row(order, false));
        entries.truncate(CAPACITY);
    }

    /// Current notifications, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Notification> {
        self.read().iter().cloned().collect()
    }

    /// Mark one notification read. Returns whether it was found.
    pub fn mark_read(&self, order_id: OrderId) -> bool {
        let mut entries = self.write();
        match entries.iter_mut().find(|n| n.order_id == order_id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark everything read.
    pub fn mark_all_read(&self) {
        for notification in self.write().iter_mut() {
            notification.read = true;
        }
    }

    /// Number of unread notifications.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.read().iter().filter(|n| !n.read).count()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, VecDeque<Notification>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, VecDeque<Notification>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use medina_core::Money;

    use super::*;

    fn order(n: u32, status: OrderStatus) -> OrderRow {
        OrderRow {
            id: OrderId::new(format!("00000000-0000-4000-8000-{n:012x}").parse().unwrap()),
            user_id: None,
            customer_name: format!("Customer {n}"),
            customer_email: format!("c{n}@example.com"),
            customer_phone: None,
            shipping_address: "addr".to_string(),
            city: "Algiers".to_string(),
            postal_code: None,
            total_amount: Money::new("260".parse().unwrap()),
            notes: None,
            status,
            created_at: "2026-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap()
                + chrono::Duration::minutes(i64::from(n)),
        }
    }

    #[test]
    fn test_seed_marks_non_pending_as_read() {
        let center = NotificationCenter::new();
        center.seed(&[
            order(2, OrderStatus::Pending),
            order(1, OrderStatus::Shipped),
        ]);

        let notifications = center.list();
        assert_eq!(notifications.len(), 2);
        assert!(!notifications[0].read);
        assert!(notifications[1].read);
        assert_eq!(center.unread_count(), 1);
    }

    #[test]
    fn test_record_insert_prepends_unread_and_caps() {
        let center = NotificationCenter::new();
        center.seed(
            &(0..10)
                .map(|n| order(n, OrderStatus::Shipped))
                .collect::<Vec<_>>(),
        );

        let fresh = order(99, OrderStatus::Pending);
        center.record_insert(&fresh);

        let notifications = center.list();
        assert_eq!(notifications.len(), 10);
        assert_eq!(notifications[0].order_id, fresh.id);
        assert!(!notifications[0].read);
        assert_eq!(center.unread_count(), 1);
    }

    #[test]
    fn test_mark_read_and_mark_all() {
        let center = NotificationCenter::new();
        let first = order(1, OrderStatus::Pending);
        let second = order(2, OrderStatus::Pending);
        center.record_insert(&first);
        center.record_insert(&second);
        assert_eq!(center.unread_count(), 2);

        assert!(center.mark_read(first.id));
        assert_eq!(center.unread_count(), 1);

        // Unknown order: nothing to mark.
        assert!(!center.mark_read(order(42, OrderStatus::Pending).id));

        center.mark_all_read();
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn test_message_carries_customer_and_total() {
        let center = NotificationCenter::new();
        center.record_insert(&order(7, OrderStatus::Pending));

        let notifications = center.list();
        assert_eq!(notifications[0].message, "New order from Customer 7 - $260.00");
    }
}
