//! Medina CLI - seeding and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Insert the demo catalog
//! medina seed products
//!
//! # Grant admin access (user id from the platform's auth dashboard)
//! medina admin grant --user-id 6f9c0a4e-...-...
//!
//! # Revoke admin access
//! medina admin revoke --user-id 6f9c0a4e-...-...
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "medina")]
#[command(author, version, about = "Medina CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the platform with demo data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage admin access
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the demo product catalog
    Products,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin role to a platform user
    Grant {
        /// The user's platform ID (a UUID)
        #[arg(short, long)]
        user_id: String,
    },
    /// Revoke the admin role from a platform user
    Revoke {
        /// The user's platform ID (a UUID)
        #[arg(short, long)]
        user_id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products => commands::seed::products().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Grant { user_id } => commands::admin::grant(&user_id).await?,
            AdminAction::Revoke { user_id } => commands::admin::revoke(&user_id).await?,
        },
    }

    Ok(())
}
