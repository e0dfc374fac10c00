//! Product writes and the unrestricted catalog read.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use maison_core::catalog::{CatalogSnapshot, Category, Collection, Product, ProductDraft};
use maison_core::projection::{
    CategoryRow, CollectionRow, ProductRow, VariantRow, assemble_products,
};
use maison_core::{ProductId, Slug};

use super::{RepositoryError, conflict_on_violation};

const PRODUCT_COLUMNS: &str = r"
    p.id, p.slug, p.sku, p.name, p.short_description, p.description, p.images,
    p.is_featured, p.is_new, p.is_bestseller,
    p.price, p.sale_price, p.compare_at_price,
    p.stock_quantity, p.allow_backorder,
    ARRAY(SELECT pc.category_id FROM product_categories pc
          WHERE pc.product_id = p.id
          ORDER BY pc.position, pc.category_id) AS category_ids,
    ARRAY(SELECT cp.collection_id FROM collection_products cp
          WHERE cp.product_id = p.id
          ORDER BY cp.collection_id) AS collection_ids,
    p.published, p.display_order, p.created_at, p.updated_at
";

const VARIANT_COLUMNS: &str =
    "v.id, v.product_id, v.size, v.color, v.sku, v.stock_quantity, v.price";

const DUPLICATE_PRODUCT: &str = "a product with this slug or SKU already exists";

/// Repository for catalog products, drafts included.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product, category and collection, published or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<CatalogSnapshot, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.id"
        ))
        .fetch_all(self.pool)
        .await?;
        let variants: Vec<VariantRow> = sqlx::query_as(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants v ORDER BY v.product_id, v.position, v.id"
        ))
        .fetch_all(self.pool)
        .await?;
        let categories: Vec<CategoryRow> = sqlx::query_as(
            "SELECT id, slug, name, description, image_url, parent_id, show_in_menu, display_order \
             FROM categories ORDER BY display_order, name",
        )
        .fetch_all(self.pool)
        .await?;
        let collections: Vec<CollectionRow> = sqlx::query_as(
            "SELECT id, slug, name, description, image_url, collection_type, published, display_order \
             FROM collections ORDER BY display_order, name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(CatalogSnapshot {
            products: assemble_products(rows, variants),
            categories: categories.into_iter().map(Category::from).collect(),
            collections: collections.into_iter().map(Collection::from).collect(),
        })
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let variants: Vec<VariantRow> = sqlx::query_as(&format!(
            "SELECT {VARIANT_COLUMNS} FROM product_variants v WHERE v.product_id = $1 \
             ORDER BY v.position, v.id"
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(Product::from((row, variants))))
    }

    /// Insert a validated product with its variants and category links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or SKU is taken or a
    /// category does not exist.
    #[instrument(skip(self, draft), fields(slug = %slug))]
    pub async fn create(
        &self,
        draft: &ProductDraft,
        slug: &Slug,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO products (
                slug, sku, name, short_description, description, images,
                is_featured, is_new, is_bestseller,
                price, sale_price, compare_at_price,
                stock_quantity, allow_backorder, published, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            ",
        )
        .bind(slug.as_str())
        .bind(blank_to_none(draft.sku.as_deref()))
        .bind(draft.name.trim())
        .bind(&draft.short_description)
        .bind(&draft.description)
        .bind(&draft.images)
        .bind(draft.is_featured)
        .bind(draft.is_new)
        .bind(draft.is_bestseller)
        .bind(draft.price)
        .bind(draft.sale_price)
        .bind(draft.compare_at_price)
        .bind(draft.stock_quantity)
        .bind(draft.allow_backorder)
        .bind(draft.published)
        .bind(draft.display_order)
        .fetch_one(&mut *tx)
        .await
        .map_err(conflict_on_violation(DUPLICATE_PRODUCT))?;

        let id = ProductId::new(id);
        write_children(&mut tx, id, draft).await?;
        tx.commit().await?;

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Replace a product, its variants and its category links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID and
    /// `RepositoryError::Conflict` if the slug or SKU is taken.
    #[instrument(skip(self, draft), fields(slug = %slug))]
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        slug: &Slug,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r"
            UPDATE products SET
                slug = $2, sku = $3, name = $4, short_description = $5, description = $6,
                images = $7, is_featured = $8, is_new = $9, is_bestseller = $10,
                price = $11, sale_price = $12, compare_at_price = $13,
                stock_quantity = $14, allow_backorder = $15, published = $16,
                display_order = $17, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(slug.as_str())
        .bind(blank_to_none(draft.sku.as_deref()))
        .bind(draft.name.trim())
        .bind(&draft.short_description)
        .bind(&draft.description)
        .bind(&draft.images)
        .bind(draft.is_featured)
        .bind(draft.is_new)
        .bind(draft.is_bestseller)
        .bind(draft.price)
        .bind(draft.sale_price)
        .bind(draft.compare_at_price)
        .bind(draft.stock_quantity)
        .bind(draft.allow_backorder)
        .bind(draft.published)
        .bind(draft.display_order)
        .execute(&mut *tx)
        .await
        .map_err(conflict_on_violation(DUPLICATE_PRODUCT))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM product_variants WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        write_children(&mut tx, id, draft).await?;
        tx.commit().await?;

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Variants and memberships cascade; order items keep
    /// their snapshot with a null product reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown ID.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Insert variants and category links in draft order.
async fn write_children(
    tx: &mut Transaction<'_, Postgres>,
    id: ProductId,
    draft: &ProductDraft,
) -> Result<(), RepositoryError> {
    for (position, variant) in (0_i32..).zip(&draft.variants) {
        sqlx::query(
            r"
            INSERT INTO product_variants (product_id, size, color, sku, stock_quantity, price, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(id)
        .bind(blank_to_none(variant.size.as_deref()))
        .bind(blank_to_none(variant.color.as_deref()))
        .bind(blank_to_none(variant.sku.as_deref()))
        .bind(variant.stock_quantity)
        .bind(variant.price)
        .bind(position)
        .execute(&mut **tx)
        .await
        .map_err(conflict_on_violation("a variant with this SKU already exists"))?;
    }

    let mut seen = Vec::with_capacity(draft.category_ids.len());
    for category_id in &draft.category_ids {
        if seen.contains(category_id) {
            continue;
        }
        seen.push(*category_id);
        sqlx::query(
            "INSERT INTO product_categories (product_id, category_id, position) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(*category_id)
        .bind(i32::try_from(seen.len() - 1).unwrap_or(i32::MAX))
        .execute(&mut **tx)
        .await
        .map_err(conflict_on_violation("category does not exist"))?;
    }

    Ok(())
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
