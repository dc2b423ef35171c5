//! Admin role management commands.

use medina_core::UserId;

use super::data_client;

/// Grant the admin role to a user.
pub async fn grant(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let user_id: UserId = user_id.parse()?;
    let data = data_client()?;

    data.grant_admin(user_id).await?;
    tracing::info!("Granted admin role to {user_id}");

    Ok(())
}

/// Revoke the admin role from a user.
pub async fn revoke(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let user_id: UserId = user_id.parse()?;
    let data = data_client()?;

    data.revoke_admin(user_id).await?;
    tracing::info!("Revoked admin role from {user_id}");

    Ok(())
}
