//! Database migration command.
//!
//! Migrations live in `migrations/` at the workspace root and are embedded
//! into the binary at compile time.
//!
//! ```text
//! migrations/
//! ├── 20260301000001_profiles.sql
//! ├── 20260301000002_catalog.sql
//! ├── 20260301000003_orders_reviews.sql
//! ├── 20260301000004_row_level_security.sql
//! └── 20260301000005_sessions.sql
//! ```

use thiserror::Error;

use maison_admin::db;

use super::{EnvError, database_url};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Apply all pending migrations.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let migrator = sqlx::migrate!("../../migrations");
    tracing::info!(available = migrator.iter().count(), "Running migrations...");
    migrator.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
