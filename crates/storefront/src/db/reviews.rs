//! Approved product reviews.

use sqlx::PgPool;
use tracing::instrument;

use maison_core::ProductId;
use maison_core::catalog::{Review, review};
use maison_core::projection::ReviewRow;

use super::RepositoryError;

/// Repository for storefront review reads.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Approved reviews of a product, featured first, then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_approved(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r"
            SELECT id, product_id, user_id, rating, title, body, reviewer_name,
                   approved, featured, created_at
            FROM reviews
            WHERE product_id = $1 AND approved
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        let mut reviews: Vec<Review> = rows.into_iter().map(Review::from).collect();
        review::sort_for_display(&mut reviews);
        Ok(reviews)
    }
}
