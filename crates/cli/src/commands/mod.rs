//! CLI command implementations.

pub mod admin;
pub mod seed;

use medina_admin::backend::AdminDataClient;
use medina_admin::config::AdminConfig;

/// Build the service-role data client from the environment.
pub fn data_client() -> Result<AdminDataClient, Box<dyn std::error::Error>> {
    let config = AdminConfig::from_env()?;
    Ok(AdminDataClient::new(&config.backend)?)
}
