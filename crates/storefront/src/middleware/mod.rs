//! HTTP middleware: sessions and auth extractors.

pub mod auth;
pub mod session;

pub use auth::{OptionalCustomer, RequireCustomer};
pub use session::create_session_layer;
