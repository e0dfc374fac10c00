//! Published catalog reads.

use sqlx::PgPool;
use tracing::instrument;

use maison_core::catalog::{Category, Collection, Product, ProductStore};
use maison_core::projection::{
    CategoryRow, CollectionRow, ProductRow, VariantRow, assemble_products,
};

use super::RepositoryError;

const PUBLISHED_PRODUCTS: &str = r"
    SELECT p.id, p.slug, p.sku, p.name, p.short_description, p.description, p.images,
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
    FROM products p
    WHERE p.published
    ORDER BY p.id
";

const PUBLISHED_VARIANTS: &str = r"
    SELECT v.id, v.product_id, v.size, v.color, v.sku, v.stock_quantity, v.price
    FROM product_variants v
    JOIN products p ON p.id = v.product_id
    WHERE p.published
    ORDER BY v.product_id, v.position, v.id
";

const CATEGORIES: &str = r"
    SELECT id, slug, name, description, image_url, parent_id, show_in_menu, display_order
    FROM categories
    ORDER BY display_order, name
";

const PUBLISHED_COLLECTIONS: &str = r"
    SELECT c.id, c.slug, c.name, c.description, c.image_url, c.collection_type,
           c.published, c.display_order,
           ARRAY(SELECT cp.product_id FROM collection_products cp
                 WHERE cp.collection_id = c.id
                 ORDER BY cp.position, cp.product_id) AS product_ids
    FROM collections c
    WHERE c.published
    ORDER BY c.display_order, c.name
";

/// [`ProductStore`] over the shared `PostgreSQL` schema.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProductStore for PgProductStore {
    type Error = RepositoryError;

    #[instrument(skip(self))]
    async fn list_published(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(PUBLISHED_PRODUCTS)
            .fetch_all(&self.pool)
            .await?;
        let variants: Vec<VariantRow> = sqlx::query_as(PUBLISHED_VARIANTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(assemble_products(rows, variants))
    }

    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows: Vec<CategoryRow> = sqlx::query_as(CATEGORIES).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_collections(&self) -> Result<Vec<Collection>, RepositoryError> {
        let rows: Vec<CollectionRow> = sqlx::query_as(PUBLISHED_COLLECTIONS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Collection::from).collect())
    }
}
