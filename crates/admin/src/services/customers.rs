//! Customer summaries derived from the orders table.
//!
//! There is no customers table: a customer is whoever has placed an order,
//! grouped by email. Guest checkouts therefore show up too, which is what
//! the back-office wants.

use chrono::{DateTime, Utc};
use serde::Serialize;

use medina_core::Money;
use medina_core::tables::OrderRow;

/// One customer as seen from their order history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSummary {
    /// Name from their most recent order.
    pub name: String,
    pub email: String,
    /// Phone from their most recent order that carried one.
    pub phone: Option<String>,
    pub orders_count: usize,
    pub total_spent: Money,
    pub last_order_at: DateTime<Utc>,
}

/// Group orders into per-customer summaries, biggest spender first.
///
/// `query` filters case-insensitively on name and email.
#[must_use]
pub fn summarize_customers(orders: &[OrderRow], query: Option<&str>) -> Vec<CustomerSummary> {
    let mut by_email: std::collections::BTreeMap<String, CustomerSummary> =
        std::collections::BTreeMap::new();

    for order in orders {
        let key = order.customer_email.to_lowercase();
        match by_email.get_mut(&key) {
            Some(summary) => {
                summary.orders_count += 1;
                summary.total_spent = summary.total_spent + order.total_amount;
                if order.created_at > summary.last_order_at {
                    summary.last_order_at = order.created_at;
                    summary.name.clone_from(&order.customer_name);
                }
                if summary.phone.is_none() {
                    summary.phone.clone_from(&order.customer_phone);
                }
            }
            None => {
                by_email.insert(
                    key,
                    CustomerSummary {
                        name: order.customer_name.clone(),
                        email: order.customer_email.clone(),
                        phone: order.customer_phone.clone(),
                        orders_count: 1,
                        total_spent: order.total_amount,
                        last_order_at: order.created_at,
                    },
                );
            }
        }
    }

    let mut customers: Vec<CustomerSummary> = by_email.into_values().collect();

    if let Some(query) = query {
        let needle = query.to_lowercase();
        customers.retain(|c| {
            c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
        });
    }

    customers.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
    customers
}
