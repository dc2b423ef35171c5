//! Wire types for the platform's auth API.
//!
//! Table rows live in [`medina_core::tables`]; these are the auth-surface
//! payloads only.

use serde::{Deserialize, Serialize};

use medina_core::UserId;

/// The platform's view of an authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Free-form profile data attached at sign-up.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

/// A signed-in session: the access token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_tolerates_missing_metadata() {
        let json = r#"{
            "id": "11111111-2222-4333-8444-555555555555",
            "email": "amina@example.com"
        }"#;

        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_metadata.full_name, None);
    }
}
