//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::config::AdminConfig;
use crate::supabase::{AuthError, StorageError, SupabaseAuthClient, SupabaseStorageClient};

/// Errors building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("auth client: {0}")]
    Auth(#[from] AuthError),
    #[error("storage client: {0}")]
    Storage(#[from] StorageError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    auth: SupabaseAuthClient,
    storage: SupabaseStorageClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either hosted-service client cannot be built
    /// from the configured keys.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, StateError> {
        let auth = SupabaseAuthClient::new(&config.supabase)?;
        let storage = SupabaseStorageClient::new(&config.supabase, &config.storage_bucket)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                auth,
                storage,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the auth service client.
    #[must_use]
    pub fn auth(&self) -> &SupabaseAuthClient {
        &self.inner.auth
    }

    /// Get a reference to the image storage client.
    #[must_use]
    pub fn storage(&self) -> &SupabaseStorageClient {
        &self.inner.storage
    }
}
