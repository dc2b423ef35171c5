//! Domain services sitting between route handlers and the platform clients.

pub mod checkout;

pub use checkout::{CheckoutError, CheckoutForm, CheckoutService, PlacedOrder};
