//! Database operations for the storefront.
//!
//! The storefront reads the shared `PostgreSQL` schema (see the workspace
//! `migrations/` directory) and writes only to the `tower_sessions` schema
//! through the session layer.
//!
//! ## Tables read
//!
//! - `products`, `product_variants`, `product_categories` - Catalog
//! - `categories`, `collections`, `collection_products` - Navigation
//! - `orders`, `order_items` - Account order history
//! - `reviews` - Approved product reviews
//!
//! # Migrations
//!
//! Migrations are run via:
//! ```bash
//! cargo run -p maison-cli -- migrate
//! ```

pub mod catalog;
pub mod orders;
pub mod reviews;

pub use catalog::PgProductStore;
pub use orders::OrderRepository;
pub use reviews::ReviewRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
