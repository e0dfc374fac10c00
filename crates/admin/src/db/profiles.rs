//! Account profiles: read to authorize admin callers, written by the CLI
//! to grant or revoke the admin role.

use sqlx::PgPool;
use tracing::instrument;

use maison_core::projection::ProfileRow;
use maison_core::{Profile, ProfileRole, UserId};

use super::RepositoryError;

/// Repository for `profiles`.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the profile of an auth user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let row: Option<ProfileRow> =
            sqlx::query_as("SELECT id, email, full_name, role FROM profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.map(Profile::from))
    }

    /// Set the role on an existing profile and return the updated profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user has no profile row.
    #[instrument(skip(self))]
    pub async fn set_role(&self, id: UserId, role: ProfileRole) -> Result<Profile, RepositoryError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "UPDATE profiles SET role = $2, updated_at = now() WHERE id = $1 \
             RETURNING id, email, full_name, role",
        )
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(self.pool)
        .await?;
        row.map(Profile::from).ok_or(RepositoryError::NotFound)
    }
}
