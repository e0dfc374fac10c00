//! Seed the catalog from a YAML file.
//!
//! Rows are matched by slug: an existing slug is replaced in place, a new
//! one is inserted. References between rows use slugs too, so a file can be
//! applied to an empty database or re-applied after edits.
//!
//! ```yaml
//! categories:
//!   - name: Women
//!   - name: Evening Dresses
//!     parent: women
//! products:
//!   - name: Silk Evening Gown
//!     price: "1200.00"
//!     published: true
//!     categories: [evening-dresses]
//!     variants:
//!       - { size: S, stockQuantity: 2 }
//! collections:
//!   - name: Resort 2026
//!     published: true
//!     products: [silk-evening-gown]
//! ```
//!
//! Categories are applied first, then products, then collections. A parent
//! category must appear earlier in the file or already exist.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use maison_admin::db::{
    self, CategoryRepository, CollectionRepository, ProductRepository, RepositoryError,
};
use maison_core::catalog::{CategoryDraft, CollectionDraft, ProductDraft};
use maison_core::{CategoryId, ProductId};

use super::{EnvError, database_url};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid {kind} {name:?}: {message}")]
    Invalid {
        kind: &'static str,
        name: String,
        message: String,
    },

    #[error("Duplicate {kind} slug in seed file: {slug}")]
    DuplicateSlug { kind: &'static str, slug: String },

    #[error("Unknown {kind} slug: {slug}")]
    UnknownReference { kind: &'static str, slug: String },

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level shape of a seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSeed {
    pub categories: Vec<SeedCategory>,
    pub products: Vec<SeedProduct>,
    pub collections: Vec<SeedCollection>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    #[serde(flatten)]
    pub draft: CategoryDraft,
    /// Parent category slug.
    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    #[serde(flatten)]
    pub draft: ProductDraft,
    /// Category slugs, primary first.
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCollection {
    #[serde(flatten)]
    pub draft: CollectionDraft,
    /// Member product slugs in display order. Omit to keep the current
    /// membership.
    #[serde(default)]
    pub products: Option<Vec<String>>,
}

/// Rows written by [`apply`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub categories_updated: usize,
    pub products_created: usize,
    pub products_updated: usize,
    pub collections_created: usize,
    pub collections_updated: usize,
}

impl CatalogSeed {
    /// Parse a seed document.
    pub fn from_yaml(content: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validate every draft and reject slugs repeated within one section.
    ///
    /// Runs before any database connection is opened.
    pub fn check(&self) -> Result<(), SeedError> {
        let mut seen = HashSet::new();
        for entry in &self.categories {
            let slug = entry
                .draft
                .validate(None)
                .map_err(|e| invalid("category", &entry.draft.name, &e))?;
            unique(&mut seen, "category", slug.into_inner())?;
        }

        seen.clear();
        for entry in &self.products {
            let slug = entry
                .draft
                .validate()
                .map_err(|e| invalid("product", &entry.draft.name, &e))?;
            unique(&mut seen, "product", slug.into_inner())?;
        }

        seen.clear();
        for entry in &self.collections {
            let slug = entry
                .draft
                .validate()
                .map_err(|e| invalid("collection", &entry.draft.name, &e))?;
            unique(&mut seen, "collection", slug.into_inner())?;
        }
        Ok(())
    }
}

fn invalid(kind: &'static str, name: &str, error: &impl std::fmt::Display) -> SeedError {
    SeedError::Invalid {
        kind,
        name: name.to_owned(),
        message: error.to_string(),
    }
}

fn unique(seen: &mut HashSet<String>, kind: &'static str, slug: String) -> Result<(), SeedError> {
    if seen.contains(&slug) {
        return Err(SeedError::DuplicateSlug { kind, slug });
    }
    seen.insert(slug);
    Ok(())
}

fn resolve<T: Copy>(
    index: &HashMap<String, T>,
    kind: &'static str,
    slug: &str,
) -> Result<T, SeedError> {
    index
        .get(slug.trim())
        .copied()
        .ok_or_else(|| SeedError::UnknownReference {
            kind,
            slug: slug.to_owned(),
        })
}

/// Read, check and apply a seed file.
pub async fn run(path: &Path) -> Result<SeedSummary, SeedError> {
    tracing::info!(path = %path.display(), "Loading catalog seed");
    let content = tokio::fs::read_to_string(path).await?;
    let seed = CatalogSeed::from_yaml(&content)?;
    seed.check()?;
    tracing::info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        collections = seed.collections.len(),
        "Seed file validated"
    );

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    tracing::info!("Connected to database");

    let summary = apply(&pool, &seed).await?;
    tracing::info!(
        categories_created = summary.categories_created,
        categories_updated = summary.categories_updated,
        products_created = summary.products_created,
        products_updated = summary.products_updated,
        collections_created = summary.collections_created,
        collections_updated = summary.collections_updated,
        "Seeding complete!"
    );
    Ok(summary)
}

/// Upsert a checked seed into the database.
pub async fn apply(pool: &PgPool, seed: &CatalogSeed) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary::default();

    let categories = CategoryRepository::new(pool);
    let mut category_ids: HashMap<String, CategoryId> = categories
        .list()
        .await?
        .into_iter()
        .map(|c| (c.slug, c.id))
        .collect();

    for entry in &seed.categories {
        let mut draft = entry.draft.clone();
        if let Some(parent) = &entry.parent {
            draft.parent_id = Some(resolve(&category_ids, "category", parent)?);
        }
        let slug = draft
            .validate(None)
            .map_err(|e| invalid("category", &draft.name, &e))?;
        let existing = category_ids.get(slug.as_str()).copied();
        draft
            .validate(existing)
            .map_err(|e| invalid("category", &draft.name, &e))?;

        let category = match existing {
            Some(id) => {
                summary.categories_updated += 1;
                categories.update(id, &draft, &slug).await?
            }
            None => {
                summary.categories_created += 1;
                categories.create(&draft, &slug).await?
            }
        };
        category_ids.insert(category.slug, category.id);
    }

    let products = ProductRepository::new(pool);
    let mut product_ids: HashMap<String, ProductId> = products
        .snapshot()
        .await?
        .products
        .into_iter()
        .map(|p| (p.slug, p.id))
        .collect();

    for entry in &seed.products {
        let mut draft = entry.draft.clone();
        if !entry.categories.is_empty() {
            draft.category_ids = entry
                .categories
                .iter()
                .map(|slug| resolve(&category_ids, "category", slug))
                .collect::<Result<_, _>>()?;
        }
        let slug = draft
            .validate()
            .map_err(|e| invalid("product", &draft.name, &e))?;

        let product = match product_ids.get(slug.as_str()).copied() {
            Some(id) => {
                summary.products_updated += 1;
                products.update(id, &draft, &slug).await?
            }
            None => {
                summary.products_created += 1;
                products.create(&draft, &slug).await?
            }
        };
        product_ids.insert(product.slug, product.id);
    }

    let collections = CollectionRepository::new(pool);
    let mut collection_ids: HashMap<String, _> = collections
        .list()
        .await?
        .into_iter()
        .map(|c| (c.slug, c.id))
        .collect();

    for entry in &seed.collections {
        let slug = entry
            .draft
            .validate()
            .map_err(|e| invalid("collection", &entry.draft.name, &e))?;

        let collection = match collection_ids.get(slug.as_str()).copied() {
            Some(id) => {
                summary.collections_updated += 1;
                collections.update(id, &entry.draft, &slug).await?
            }
            None => {
                summary.collections_created += 1;
                collections.create(&entry.draft, &slug).await?
            }
        };

        if let Some(members) = &entry.products {
            let ids = members
                .iter()
                .map(|slug| resolve(&product_ids, "product", slug))
                .collect::<Result<Vec<_>, _>>()?;
            collections.replace_products(collection.id, &ids).await?;
        }
        collection_ids.insert(collection.slug, collection.id);
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const CATALOG: &str = r#"
categories:
  - name: Women
  - name: Evening Dresses
    parent: women
    displayOrder: 2
products:
  - name: Silk Evening Gown
    price: "1200.00"
    salePrice: "950.00"
    published: true
    categories: [evening-dresses, women]
    variants:
      - { size: S, stockQuantity: 2 }
      - { size: M, stockQuantity: 0 }
collections:
  - name: Resort 2026
    published: true
    products: [silk-evening-gown]
  - name: Archive
"#;

    #[test]
    fn test_parses_catalog_file() {
        let seed = CatalogSeed::from_yaml(CATALOG).unwrap();
        seed.check().unwrap();

        assert_eq!(seed.categories.len(), 2);
        assert_eq!(seed.categories[1].parent.as_deref(), Some("women"));
        assert_eq!(seed.categories[1].draft.display_order, 2);
        assert!(seed.categories[0].draft.show_in_menu);

        let gown = &seed.products[0];
        assert_eq!(gown.draft.price, Decimal::new(120_000, 2));
        assert_eq!(gown.draft.sale_price, Some(Decimal::new(95_000, 2)));
        assert_eq!(gown.categories, ["evening-dresses", "women"]);
        assert_eq!(gown.draft.variants.len(), 2);

        assert_eq!(
            seed.collections[0].products.as_deref(),
            Some(&["silk-evening-gown".to_string()][..])
        );
        assert!(seed.collections[1].products.is_none());
    }

    #[test]
    fn test_empty_file_is_valid() {
        let seed = CatalogSeed::from_yaml("{}").unwrap();
        seed.check().unwrap();
        assert!(seed.products.is_empty());
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(matches!(
            CatalogSeed::from_yaml("brands: []"),
            Err(SeedError::Yaml(_))
        ));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let seed = CatalogSeed::from_yaml(
            r#"
products:
  - name: Cashmere Wrap
    price: "480"
  - name: Cashmere wrap
    price: "520"
"#,
        )
        .unwrap();
        assert!(matches!(
            seed.check(),
            Err(SeedError::DuplicateSlug { kind: "product", ref slug }) if slug == "cashmere-wrap"
        ));
    }

    #[test]
    fn test_invalid_draft_rejected() {
        let seed = CatalogSeed::from_yaml(
            r#"
products:
  - name: Leather Tote
    price: "300"
    salePrice: "350"
"#,
        )
        .unwrap();
        let err = seed.check().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid product \"Leather Tote\": sale price cannot exceed the regular price"
        );
    }

    #[test]
    fn test_resolve_reports_missing_slug() {
        let index = HashMap::from([("women".to_string(), CategoryId::new(1))]);
        assert_eq!(resolve(&index, "category", " women ").unwrap(), CategoryId::new(1));
        assert!(matches!(
            resolve(&index, "category", "men"),
            Err(SeedError::UnknownReference { kind: "category", .. })
        ));
    }
}
