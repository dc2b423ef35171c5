//! Sales analytics computed in-process.
//!
//! The admin panel fetches the raw rows once per page view and aggregates
//! here. At this store's scale that is cheaper and simpler than pushing
//! aggregate queries to the platform, and it keeps every number testable.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use medina_core::tables::{OrderItemRow, OrderRow, ProductRow};
use medina_core::{Money, OrderStatus};

/// Headline store numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    /// Sum of every order's total, regardless of status.
    pub total_revenue: Money,
    pub total_orders: usize,
    /// Orders still needing admin attention (pending/confirmed/shipped).
    pub open_orders: usize,
    pub total_products: usize,
    /// Distinct customer emails across all orders.
    pub total_customers: usize,
}

/// Revenue bucketed by calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub amount: Money,
    pub orders: usize,
}

/// How many orders sit in each status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// How many products each category holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// A product ranked by units sold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub product_name: String,
    pub units_sold: u32,
    pub revenue: Money,
}

/// Category label for products without one.
const UNCATEGORIZED: &str = "uncategorized";

/// Headline numbers over all orders and the product count.
#[must_use]
pub fn store_stats(orders: &[OrderRow], total_products: usize) -> StoreStats {
    let total_revenue: Money = orders.iter().map(|o| o.total_amount).sum();
    let total_customers = orders
        .iter()
        .map(|o| o.customer_email.to_lowercase())
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    StoreStats {
        total_revenue,
        total_orders: orders.len(),
        open_orders: orders.iter().filter(|o| o.status.is_open()).count(),
        total_products,
        total_customers,
    }
}

/// Revenue per calendar day, oldest day first.
#[must_use]
pub fn sales_by_day(orders: &[OrderRow]) -> Vec<DailySales> {
    let mut days: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();

    for order in orders {
        let entry = days
            .entry(order.created_at.date_naive())
            .or_insert((Money::ZERO, 0));
        entry.0 = entry.0 + order.total_amount;
        entry.1 += 1;
    }

    days.into_iter()
        .map(|(date, (amount, orders))| DailySales {
            date,
            amount,
            orders,
        })
        .collect()
}

/// Order counts per status, in lifecycle order, zero-count statuses omitted.
#[must_use]
pub fn status_breakdown(orders: &[OrderRow]) -> Vec<StatusCount> {
    OrderStatus::ALL
        .into_iter()
        .filter_map(|status| {
            let count = orders.iter().filter(|o| o.status == status).count();
            (count > 0).then_some(StatusCount { status, count })
        })
        .collect()
}

/// Product counts per category, alphabetical.
#[must_use]
pub fn category_breakdown(products: &[ProductRow]) -> Vec<CategoryCount> {
    let mut categories: BTreeMap<String, usize> = BTreeMap::new();

    for product in products {
        let category = product
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        *categories.entry(category).or_insert(0) += 1;
    }

    categories
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect()
}

/// Products ranked by units sold across all order line items.
///
/// Grouped by the snapshotted product name: a renamed product keeps its
/// sales history under the name it sold as.
#[must_use]
pub fn top_products(items: &[OrderItemRow], limit: usize) -> Vec<TopProduct> {
    let mut by_name: BTreeMap<&str, (u32, Money)> = BTreeMap::new();

    for item in items {
        let entry = by_name
            .entry(item.product_name.as_str())
            .or_insert((0, Money::ZERO));
        entry.0 += item.quantity;
        entry.1 = entry.1 + item.product_price.mul_quantity(item.quantity);
    }

    let mut ranked: Vec<TopProduct> = by_name
        .into_iter()
        .map(|(name, (units_sold, revenue))| TopProduct {
            product_name: name.to_string(),
            units_sold,
            revenue,
        })
        .collect();

    ranked.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};
    use medina_core::{OrderId, OrderItemId};

    use super::*;

    fn order(email: &str, total: &str, status: OrderStatus, day: u32) -> OrderRow {
        OrderRow {
            id: OrderId::generate(),
            user_id: None,
            customer_name: "x".to_string(),
            customer_email: email.to_string(),
            customer_phone: None,
            shipping_address: "addr".to_string(),
            city: "Algiers".to_string(),
            postal_code: None,
            total_amount: Money::new(total.parse().unwrap()),
            notes: None,
            status,
            created_at: format!("2026-03-{day:02}T10:00:00Z")
                .parse::<DateTime<Utc>>()
                .unwrap(),
        }
    }

    fn item(name: &str, price: &str, quantity: u32) -> OrderItemRow {
        OrderItemRow {
            id: OrderItemId::generate(),
            order_id: OrderId::generate(),
            product_id: None,
            product_name: name.to_string(),
            product_price: Money::new(price.parse().unwrap()),
            quantity,
            size: None,
        }
    }

    #[test]
    fn test_store_stats_counts_distinct_customers() {
        let orders = vec![
            order("a@example.com", "100", OrderStatus::Pending, 1),
            order("A@Example.com", "50", OrderStatus::Shipped, 2),
            order("b@example.com", "25", OrderStatus::Delivered, 2),
        ];

        let stats = store_stats(&orders, 7);
        assert_eq!(stats.total_revenue, Money::new("175".parse().unwrap()));
        assert_eq!(stats.total_orders, 3);
        // Delivered is settled; pending and shipped still need attention.
        assert_eq!(stats.open_orders, 2);
        assert_eq!(stats.total_products, 7);
        assert_eq!(stats.total_customers, 2);
    }

    #[test]
    fn test_sales_by_day_buckets_and_sorts() {
        let orders = vec![
            order("a@example.com", "100", OrderStatus::Pending, 2),
            order("b@example.com", "50", OrderStatus::Pending, 1),
            order("c@example.com", "25", OrderStatus::Pending, 2),
        ];

        let days = sales_by_day(&orders);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date.to_string(), "2026-03-01");
        assert_eq!(days[0].amount, Money::new("50".parse().unwrap()));
        assert_eq!(days[1].amount, Money::new("125".parse().unwrap()));
        assert_eq!(days[1].orders, 2);
    }

    #[test]
    fn test_status_breakdown_omits_empty_statuses() {
        let orders = vec![
            order("a@example.com", "1", OrderStatus::Pending, 1),
            order("b@example.com", "1", OrderStatus::Pending, 1),
            order("c@example.com", "1", OrderStatus::Cancelled, 1),
        ];

        let breakdown = status_breakdown(&orders);
        assert_eq!(
            breakdown,
            vec![
                StatusCount {
                    status: OrderStatus::Pending,
                    count: 2
                },
                StatusCount {
                    status: OrderStatus::Cancelled,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_products_ranks_by_units() {
        let items = vec![
            item("Linen shirt", "100", 2),
            item("Scarf", "20", 5),
            item("Linen shirt", "100", 1),
        ];

        let top = top_products(&items, 10);
        assert_eq!(top[0].product_name, "Scarf");
        assert_eq!(top[0].units_sold, 5);
        assert_eq!(top[1].product_name, "Linen shirt");
        assert_eq!(top[1].units_sold, 3);
        assert_eq!(top[1].revenue, Money::new("300".parse().unwrap()));
    }

    #[test]
    fn test_top_products_respects_limit() {
        let items = vec![item("A", "1", 1), item("B", "1", 2), item("C", "1", 3)];
        assert_eq!(top_products(&items, 2).len(), 2);
    }
}
