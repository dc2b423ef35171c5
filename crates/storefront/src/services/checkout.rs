//! Checkout: validation, totals, and the order-then-items submission.
//!
//! The flow is the request lifecycle of one submit: validate locally, write
//! the order row, write the line-item batch referencing its ID, and only
//! then report success. Validation failures never reach the network. A
//! backend failure leaves the caller's cart untouched for resubmission.
//!
//! The two writes are not wrapped in a server-side transaction. If the order
//! insert succeeds and the line-item batch fails, the order persists with no
//! items; that window is surfaced as [`CheckoutError::OrphanedOrder`] and
//! logged rather than papered over.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use medina_core::tables::{NewOrderItemRow, NewOrderRow};
use medina_core::{Cart, Email, Money, OrderId, OrderStatus, PaymentMethod, UserId};

use crate::backend::{BackendError, DataClient};
use crate::config::CheckoutConfig;

/// Submitted checkout form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Field-level validation messages, keyed by form field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Why a checkout submission was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart has no lines; the flow is not enterable.
    #[error("cart is empty")]
    EmptyCart,

    /// Required fields are missing or malformed. Nothing was sent.
    #[error("validation failed: {0:?}")]
    Invalid(FieldErrors),

    /// The order insert itself failed; nothing was written.
    #[error("order creation failed: {0}")]
    Backend(#[from] BackendError),

    /// The order row exists but its line items could not be written.
    /// There is no compensating transaction; the order id is kept for
    /// operator follow-up.
    #[error("order {order_id} created but line items failed: {source}")]
    OrphanedOrder {
        order_id: OrderId,
        source: BackendError,
    },
}

/// Price breakdown for the current cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub total: Money,
    /// Whether the subtotal crossed the free-shipping threshold.
    pub free_shipping: bool,
}

/// What the customer owes and how they chose to pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentInstructions {
    /// Pay the courier; nothing further to do.
    CashOnDelivery,
    /// Transfer against this account reference. Not verified, not blocking.
    BankTransfer { account_reference: String },
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    /// Short human-facing reference (first 8 hex chars, uppercased).
    pub reference: String,
    pub total: Money,
    pub payment: PaymentInstructions,
}

/// Checkout service: owns the pricing knobs, stateless otherwise.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    config: CheckoutConfig,
}

impl CheckoutService {
    /// Create a checkout service from the pricing configuration.
    #[must_use]
    pub const fn new(config: CheckoutConfig) -> Self {
        Self { config }
    }

    /// Compute the price breakdown for a cart.
    ///
    /// The flat shipping fee applies below the free-shipping threshold; at
    /// or above it the total is exactly the subtotal.
    #[must_use]
    pub fn quote(&self, cart: &Cart) -> Quote {
        let subtotal = cart.subtotal();
        let free_shipping = subtotal.amount() >= self.config.free_shipping_threshold;
        let shipping_fee = if free_shipping {
            Money::ZERO
        } else {
            Money::new(self.config.shipping_fee)
        };

        Quote {
            subtotal,
            shipping_fee,
            total: subtotal + shipping_fee,
            free_shipping,
        }
    }

    /// Validate the form without touching the network.
    ///
    /// # Errors
    ///
    /// Returns the map of field-level messages when any required field is
    /// blank or malformed.
    pub fn validate(&self, form: &CheckoutForm) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if form.name.trim().is_empty() {
            errors.insert("name", "Full name is required".to_string());
        }
        if form.email.trim().is_empty() {
            errors.insert("email", "Email is required".to_string());
        } else if let Err(e) = Email::parse(form.email.trim()) {
            errors.insert("email", e.to_string());
        }
        if form.shipping_address.trim().is_empty() {
            errors.insert("shipping_address", "Shipping address is required".to_string());
        }
        if form.city.trim().is_empty() {
            errors.insert("city", "City is required".to_string());
        }
        if form.payment_method == PaymentMethod::BankTransfer
            && self.config.bank_transfer_reference.is_none()
        {
            errors.insert(
                "payment_method",
                "Bank transfer is not available".to_string(),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Place an order for the cart's contents.
    ///
    /// Order of operations is fixed: the order row is created first so its
    /// server-assigned ID is known, then the line items are written in one
    /// batch. The cart itself is not mutated here; the caller clears its
    /// session cart only after this returns `Ok`.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`] for the failure taxonomy.
    #[instrument(skip_all, fields(lines = cart.lines().len()))]
    pub async fn place_order(
        &self,
        data: &DataClient,
        cart: &Cart,
        form: &CheckoutForm,
        customer: Option<(UserId, &str)>,
    ) -> Result<PlacedOrder, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.validate(form).map_err(CheckoutError::Invalid)?;

        let quote = self.quote(cart);
        let (user_id, access_token) = match customer {
            Some((id, token)) => (Some(id), Some(token)),
            None => (None, None),
        };

        let new_order = NewOrderRow {
            user_id,
            customer_name: form.name.trim().to_string(),
            customer_email: form.email.trim().to_string(),
            customer_phone: non_blank(&form.phone),
            shipping_address: form.shipping_address.trim().to_string(),
            city: form.city.trim().to_string(),
            postal_code: non_blank(&form.postal_code),
            total_amount: quote.total,
            notes: non_blank(&form.notes),
            status: OrderStatus::Pending,
        };

        let order = data.insert_order(&new_order, access_token).await?;

        let items: Vec<NewOrderItemRow> = cart
            .lines()
            .iter()
            .map(|line| NewOrderItemRow {
                order_id: order.id,
                product_id: Some(line.product.product_id),
                product_name: line.product.name.clone(),
                product_price: line.product.unit_price,
                quantity: line.quantity,
                size: line.product.size.clone(),
            })
            .collect();

        if let Err(source) = data.insert_order_items(&items, access_token).await {
            tracing::error!(
                order_id = %order.id,
                error = %source,
                "Order created but line items failed; order persists without items"
            );
            return Err(CheckoutError::OrphanedOrder {
                order_id: order.id,
                source,
            });
        }

        let payment = match form.payment_method {
            PaymentMethod::CashOnDelivery => PaymentInstructions::CashOnDelivery,
            PaymentMethod::BankTransfer => PaymentInstructions::BankTransfer {
                // validate() guarantees the reference exists for this method
                account_reference: self
                    .config
                    .bank_transfer_reference
                    .clone()
                    .unwrap_or_default(),
            },
        };

        Ok(PlacedOrder {
            order_id: order.id,
            reference: order.id.short(),
            total: quote.total,
            payment,
        })
    }
}

/// Trim a form field, mapping blank to `None`.
fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
