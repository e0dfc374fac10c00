//! Review moderation.

use sqlx::PgPool;
use tracing::instrument;

use maison_core::catalog::{Review, ReviewModeration};
use maison_core::projection::ReviewRow;
use maison_core::{ProductId, ReviewId};

use super::RepositoryError;

const COLUMNS: &str =
    "id, product_id, user_id, rating, title, body, reviewer_name, approved, featured, created_at";

/// Moderation queue filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    pub approved: Option<bool>,
    pub product_id: Option<ProductId>,
}

/// Repository for reviews across all products.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Matching reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: ReviewFilter) -> Result<Vec<Review>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            r"
            SELECT {COLUMNS} FROM reviews
            WHERE ($1::boolean IS NULL OR approved = $1)
              AND ($2::integer IS NULL OR product_id = $2)
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(filter.approved)
        .bind(filter.product_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    /// Set the approved and featured flags; absent fields are unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub async fn moderate(
        &self,
        id: ReviewId,
        change: ReviewModeration,
    ) -> Result<Review, RepositoryError> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!(
            r"
            UPDATE reviews
            SET approved = COALESCE($2, approved), featured = COALESCE($3, featured)
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(change.approved)
        .bind(change.featured)
        .fetch_optional(self.pool)
        .await?;
        row.map(Review::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
