//! Maison CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply all pending migrations
//! maison-cli migrate
//!
//! # Upsert a catalog from a YAML file
//! maison-cli seed catalog.yaml
//!
//! # Grant or revoke the admin role
//! maison-cli admin grant 6f1c2a52-8e0b-4b0a-9a43-2d6f0c3e9a11
//! maison-cli admin revoke 6f1c2a52-8e0b-4b0a-9a43-2d6f0c3e9a11
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use maison_core::UserId;

mod commands;

#[derive(Parser)]
#[command(name = "maison-cli")]
#[command(author, version, about = "Maison CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Upsert categories, products and collections from a YAML file
    Seed {
        /// Path to the catalog file
        file: PathBuf,
    },
    /// Manage the admin role
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Give a user the admin role
    Grant {
        /// Auth user ID
        user_id: UserId,
    },
    /// Return a user to the customer role
    Revoke {
        /// Auth user ID
        user_id: UserId,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => {
            commands::seed::run(&file).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Grant { user_id } => commands::admin::grant(user_id).await?,
            AdminAction::Revoke { user_id } => commands::admin::revoke(user_id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_admin_grant_parses_uuid() {
        let cli = Cli::try_parse_from([
            "maison-cli",
            "admin",
            "grant",
            "6f1c2a52-8e0b-4b0a-9a43-2d6f0c3e9a11",
        ]);
        assert!(cli.is_ok());

        let bad = Cli::try_parse_from(["maison-cli", "admin", "revoke", "alice"]);
        assert!(bad.is_err());
    }
}
