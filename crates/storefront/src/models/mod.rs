//! Session models and keys.

/// Keys under which storefront state lives in the tower-session.
pub mod session_keys {
    /// The [`medina_core::Cart`] for this session.
    pub const CART: &str = "cart";
    /// The signed-in customer's [`crate::backend::types::AuthSession`].
    pub const CUSTOMER: &str = "customer";
}
