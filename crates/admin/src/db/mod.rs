//! Database operations for the admin API.
//!
//! The admin binary owns every catalog write. All repositories borrow the
//! shared pool and map unique-key violations to
//! [`RepositoryError::Conflict`] so handlers can answer `409`.
//!
//! ## Tables written
//!
//! - `products`, `product_variants`, `product_categories` - Catalog
//! - `categories` - Category tree
//! - `collections`, `collection_products` - Curated collections
//! - `orders` - Status, payment status and tracking number only
//! - `reviews` - Moderation flags and deletion
//!
//! `profiles` is read to authorize admin callers; roles are granted with
//! `maison-cli admin grant`.

pub mod categories;
pub mod collections;
pub mod orders;
pub mod products;
pub mod profiles;
pub mod reviews;
pub mod stats;

pub use categories::CategoryRepository;
pub use collections::CollectionRepository;
pub use orders::{OrderFilter, OrderListing, OrderRepository};
pub use products::ProductRepository;
pub use profiles::ProfileRepository;
pub use reviews::{ReviewFilter, ReviewRepository};
pub use stats::{DatabaseProbe, TableCounts};

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

/// Map unique and foreign-key violations to `Conflict` with `message`.
pub(crate) fn conflict_on_violation(
    message: &'static str,
) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
        {
            return RepositoryError::Conflict(message.to_owned());
        }
        RepositoryError::Database(e)
    }
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
