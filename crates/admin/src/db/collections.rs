//! Collection writes and membership.

use sqlx::PgPool;
use tracing::instrument;

use maison_core::catalog::{Collection, CollectionDraft};
use maison_core::projection::CollectionRow;
use maison_core::{CollectionId, ProductId, Slug};

use super::{RepositoryError, conflict_on_violation};

const COLUMNS: &str =
    "id, slug, name, description, image_url, collection_type, published, display_order";

/// Repository for collections.
pub struct CollectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepository<'a> {
    /// Create a new collection repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All collections, drafts included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Collection>, RepositoryError> {
        let rows: Vec<CollectionRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM collections ORDER BY display_order, name"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Collection::from).collect())
    }

    /// Insert a validated collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    #[instrument(skip(self, draft), fields(slug = %slug))]
    pub async fn create(
        &self,
        draft: &CollectionDraft,
        slug: &Slug,
    ) -> Result<Collection, RepositoryError> {
        let row: CollectionRow = sqlx::query_as(&format!(
            r"
            INSERT INTO collections (slug, name, description, image_url, collection_type, published, display_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "
        ))
        .bind(slug.as_str())
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(draft.collection_type.as_str())
        .bind(draft.published)
        .bind(draft.display_order)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_violation("a collection with this slug already exists"))?;
        Ok(row.into())
    }

    /// Replace a collection's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID and
    /// `RepositoryError::Conflict` on a duplicate slug.
    #[instrument(skip(self, draft), fields(slug = %slug))]
    pub async fn update(
        &self,
        id: CollectionId,
        draft: &CollectionDraft,
        slug: &Slug,
    ) -> Result<Collection, RepositoryError> {
        let row: Option<CollectionRow> = sqlx::query_as(&format!(
            r"
            UPDATE collections SET
                slug = $2, name = $3, description = $4, image_url = $5,
                collection_type = $6, published = $7, display_order = $8
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(slug.as_str())
        .bind(draft.name.trim())
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(draft.collection_type.as_str())
        .bind(draft.published)
        .bind(draft.display_order)
        .fetch_optional(self.pool)
        .await
        .map_err(conflict_on_violation("a collection with this slug already exists"))?;
        row.map(Collection::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a collection and its membership rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CollectionId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace the collection's products with `product_ids`, in order.
    ///
    /// Duplicate IDs keep their first position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown collection and
    /// `RepositoryError::Conflict` when a product does not exist.
    #[instrument(skip(self, product_ids), fields(count = product_ids.len()))]
    pub async fn replace_products(
        &self,
        id: CollectionId,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductId>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM collections WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM collection_products WHERE collection_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let mut members: Vec<ProductId> = Vec::with_capacity(product_ids.len());
        for product_id in product_ids {
            if members.contains(product_id) {
                continue;
            }
            sqlx::query(
                "INSERT INTO collection_products (collection_id, product_id, position) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(*product_id)
            .bind(i32::try_from(members.len()).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await
            .map_err(conflict_on_violation("product does not exist"))?;
            members.push(*product_id);
        }

        tx.commit().await?;
        Ok(members)
    }
}
