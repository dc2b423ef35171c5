//! Session models and keys.

use serde::{Deserialize, Serialize};

use medina_core::UserId;

/// Keys under which admin state lives in the tower-session.
pub mod session_keys {
    /// The signed-in [`CurrentAdmin`].
    pub const CURRENT_ADMIN: &str = "current_admin";
}

/// The signed-in admin, as stored in the session after the role check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub user_id: UserId,
    pub email: String,
}
