//! Admin role management.
//!
//! The user must have signed up through the hosted auth service first so
//! that a `profiles` row exists.
//!
//! ```bash
//! maison-cli admin grant <user-id>
//! maison-cli admin revoke <user-id>
//! ```

use thiserror::Error;

use maison_admin::db::{self, ProfileRepository, RepositoryError};
use maison_core::{ProfileRole, UserId};

use super::{EnvError, database_url};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No profile for user {0}; the user must sign up first")]
    UnknownUser(UserId),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Give `user_id` the admin role.
pub async fn grant(user_id: UserId) -> Result<(), AdminError> {
    set_role(user_id, ProfileRole::Admin).await
}

/// Return `user_id` to the customer role.
pub async fn revoke(user_id: UserId) -> Result<(), AdminError> {
    set_role(user_id, ProfileRole::Customer).await
}

async fn set_role(user_id: UserId, role: ProfileRole) -> Result<(), AdminError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let profile = ProfileRepository::new(&pool)
        .set_role(user_id, role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UnknownUser(user_id),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(
        user_id = %profile.id,
        email = profile.email.as_deref().unwrap_or("-"),
        role = profile.role.as_str(),
        "Role updated"
    );
    Ok(())
}
