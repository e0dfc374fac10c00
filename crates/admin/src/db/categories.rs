//! Category tree writes.

use sqlx::PgPool;
use tracing::instrument;

use maison_core::catalog::{Category, CategoryDraft};
use maison_core::projection::CategoryRow;
use maison_core::{CategoryId, Slug};

use super::{RepositoryError, conflict_on_violation};

const COLUMNS: &str =
    "id, slug, name, description, image_url, parent_id, show_in_menu, display_order";

/// Repository for categories.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories in menu order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM categories ORDER BY display_order, name"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Insert a validated category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken or the
    /// parent does not exist.
    #[instrument(skip(self, draft), fields(slug = %slug))]
    pub async fn create(
        &self,
        draft: &CategoryDraft,
        slug: &Slug,
    ) -> Result<Category, RepositoryError> {
        let row: CategoryRow = sqlx::query_as(&format!(
            r"
            INSERT INTO categories (slug, name, description, image_url, parent_id, show_in_menu, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "
        ))
        .bind(slug.as_str())
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(draft.parent_id)
        .bind(draft.show_in_menu)
        .bind(draft.display_order)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_violation(
            "slug already exists or parent category is missing",
        ))?;
        Ok(row.into())
    }

    /// Replace a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID and
    /// `RepositoryError::Conflict` on a duplicate slug or missing parent.
    #[instrument(skip(self, draft), fields(slug = %slug))]
    pub async fn update(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
        slug: &Slug,
    ) -> Result<Category, RepositoryError> {
        let row: Option<CategoryRow> = sqlx::query_as(&format!(
            r"
            UPDATE categories SET
                slug = $2, name = $3, description = $4, image_url = $5,
                parent_id = $6, show_in_menu = $7, display_order = $8
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(slug.as_str())
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(draft.parent_id)
        .bind(draft.show_in_menu)
        .bind(draft.display_order)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_violation(
            "slug already exists or parent category is missing",
        ))?;
        row.map(Category::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Children are re-parented to the root and product
    /// links are dropped by the schema.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
