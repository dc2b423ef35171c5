//! The session cart state container.
//!
//! A cart lives for the duration of a storefront session and is the only
//! mutable state the storefront owns; everything durable belongs to the
//! hosted data platform. All operations here are total functions over the
//! in-memory collection - there are no error conditions.
//!
//! Invariants, re-derived on every read rather than cached:
//! - every line has `quantity > 0` (a line reaching zero is removed)
//! - `count() == sum(quantity)` and `subtotal() == sum(price * quantity)`
//! - at most one line per `(product_id, size)` pair

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// A product snapshot taken at add-to-cart time.
///
/// Name, price, and image are copied from the catalog when the line is
/// created; later catalog edits do not rewrite what the customer saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub image_url: Option<String>,
    /// Size variant, if the product has one.
    pub size: Option<String>,
}

/// One line of the cart: a product snapshot plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: CartProduct,
    pub quantity: u32,
}

impl CartLine {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.unit_price.mul_quantity(self.quantity)
    }

    fn matches(&self, product_id: ProductId, size: Option<&str>) -> bool {
        self.product.product_id == product_id && self.product.size.as_deref() == size
    }
}

/// The cart itself.
///
/// Lines are kept in insertion order, the order the customer added them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a product to the cart.
    ///
    /// If a line for the same `(product_id, size)` already exists its
    /// quantity is incremented; otherwise a new line is appended. A zero
    /// quantity is a no-op (no zero-quantity line is ever stored).
    pub fn add(&mut self, product: CartProduct, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.matches(product.product_id, product.size.as_deref()))
        {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine { product, quantity }),
        }
    }

    /// Adjust a line's quantity by `delta`, clamping at zero.
    ///
    /// A line whose quantity reaches zero (or would go below it) is removed
    /// from the cart. Unknown lines are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, size: Option<&str>, delta: i64) {
        for line in &mut self.lines {
            if line.matches(product_id, size) {
                let updated = i64::from(line.quantity).saturating_add(delta).max(0);
                line.quantity = u32::try_from(updated).unwrap_or(u32::MAX);
            }
        }
        self.lines.retain(|line| line.quantity > 0);
    }

    /// Remove a line unconditionally. Unknown lines are ignored.
    pub fn remove(&mut self, product_id: ProductId, size: Option<&str>) {
        self.lines.retain(|line| !line.matches(product_id, size));
    }

    /// Empty the cart (called after a successful checkout).
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total item count: the sum of all line quantities.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of `unit_price * quantity` across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn product(id: &str, price: &str, size: Option<&str>) -> CartProduct {
        CartProduct {
            product_id: ProductId::new(id.parse().unwrap()),
            name: format!("product {id}"),
            unit_price: Money::new(price.parse().unwrap()),
            image_url: None,
            size: size.map(String::from),
        }
    }

    const ID_A: &str = "00000000-0000-4000-8000-00000000000a";
    const ID_B: &str = "00000000-0000-4000-8000-00000000000b";

    #[test]
    fn test_add_merges_same_product_and_size() {
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", Some("M")), 1);
        cart.add(product(ID_A, "100", Some("M")), 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_add_distinct_sizes_are_separate_lines() {
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", Some("M")), 1);
        cart.add(product(ID_A, "100", Some("L")), 1);

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", None), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_and_removes_at_zero() {
        let id: ProductId = ID_A.parse().unwrap();
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", None), 2);

        cart.update_quantity(id, None, -1);
        assert_eq!(cart.count(), 1);

        // Reaching zero removes the line.
        cart.update_quantity(id, None, -1);
        assert!(cart.is_empty());

        // Going below zero clamps and also removes.
        cart.add(product(ID_A, "100", None), 1);
        cart.update_quantity(id, None, -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_targets_only_the_matching_size() {
        let id: ProductId = ID_A.parse().unwrap();
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", Some("M")), 1);
        cart.add(product(ID_A, "100", Some("L")), 1);

        cart.update_quantity(id, Some("M"), -1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product.size.as_deref(), Some("L"));
    }

    #[test]
    fn test_remove_is_unconditional() {
        let id: ProductId = ID_A.parse().unwrap();
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", None), 5);
        cart.remove(id, None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", None), 2);
        cart.add(product(ID_B, "50", None), 1);

        assert_eq!(cart.subtotal(), Money::new("250".parse().unwrap()));
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cart = Cart::new();
        cart.add(product(ID_A, "100", None), 2);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.subtotal(), Money::ZERO);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { product: usize, size: Option<u8>, quantity: u32 },
        Update { product: usize, size: Option<u8>, delta: i64 },
        Remove { product: usize, size: Option<u8> },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let size = prop::option::of(0u8..3);
        prop_oneof![
            (0usize..4, size.clone(), 1u32..10).prop_map(|(product, size, quantity)| Op::Add {
                product,
                size,
                quantity
            }),
            (0usize..4, size.clone(), -12i64..12).prop_map(|(product, size, delta)| Op::Update {
                product,
                size,
                delta
            }),
            (0usize..4, size).prop_map(|(product, size)| Op::Remove { product, size }),
        ]
    }

    fn pool_product(index: usize, size: Option<u8>) -> CartProduct {
        let ids = [ID_A, ID_B,
            "00000000-0000-4000-8000-00000000000c",
            "00000000-0000-4000-8000-00000000000d"];
        let sizes = ["S", "M", "L"];
        product(
            ids[index % ids.len()],
            &format!("{}.50", 10 + index),
            size.map(|s| sizes[s as usize % sizes.len()]),
        )
    }

    proptest! {
        /// After any operation sequence, the derived values match a fresh
        /// recomputation from the lines and no line has a zero quantity.
        #[test]
        fn prop_derived_values_hold(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut cart = Cart::new();

            for op in ops {
                match op {
                    Op::Add { product, size, quantity } => {
                        cart.add(pool_product(product, size), quantity);
                    }
                    Op::Update { product, size, delta } => {
                        let p = pool_product(product, size);
                        cart.update_quantity(p.product_id, p.size.as_deref(), delta);
                    }
                    Op::Remove { product, size } => {
                        let p = pool_product(product, size);
                        cart.remove(p.product_id, p.size.as_deref());
                    }
                }

                let expected_count: u32 = cart.lines().iter().map(|l| l.quantity).sum();
                let expected_subtotal: Money = cart
                    .lines()
                    .iter()
                    .map(|l| l.product.unit_price.mul_quantity(l.quantity))
                    .sum();

                prop_assert_eq!(cart.count(), expected_count);
                prop_assert_eq!(cart.subtotal(), expected_subtotal);
                prop_assert!(cart.lines().iter().all(|l| l.quantity > 0));

                // One line per (product, size) pair.
                let mut keys: Vec<_> = cart
                    .lines()
                    .iter()
                    .map(|l| (l.product.product_id, l.product.size.clone()))
                    .collect();
                keys.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.to_string().cmp(&b.0.to_string())));
                keys.dedup();
                prop_assert_eq!(keys.len(), cart.lines().len());
            }
        }
    }
}
