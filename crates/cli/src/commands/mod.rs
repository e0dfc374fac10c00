//! Subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors shared by every command.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("Missing environment variable: ADMIN_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,
}

/// Load `.env` and read the database URL the admin binary uses.
pub fn database_url() -> Result<SecretString, EnvError> {
    dotenvy::dotenv().ok();

    std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| EnvError::MissingDatabaseUrl)
}
