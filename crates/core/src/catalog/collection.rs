//! Curated collections.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CollectionId, CollectionType, ProductId, Slug, SlugError};

/// A curated grouping of products, independent of the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub collection_type: CollectionType,
    pub published: bool,
    pub display_order: i32,
    /// Members in curated order. Only loaded for storefront reads.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<ProductId>,
}

/// Find a collection by slug.
#[must_use]
pub fn find_by_slug<'a>(collections: &'a [Collection], slug: &str) -> Option<&'a Collection> {
    collections.iter().find(|c| c.slug == slug)
}

/// Validation failures for collection writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionValidationError {
    #[error("collection name is required")]
    EmptyName,
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),
}

/// Write shape for creating or replacing a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub collection_type: CollectionType,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub display_order: i32,
}

impl CollectionDraft {
    /// Check the draft and resolve the slug to store.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<Slug, CollectionValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CollectionValidationError::EmptyName);
        }
        let slug = match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => Slug::parse(slug)?,
            _ => Slug::from_name(name)?,
        };
        Ok(slug)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let draft: CollectionDraft = serde_json::from_str(r#"{"name":"Resort 2026"}"#).unwrap();
        assert_eq!(draft.collection_type, CollectionType::Curated);
        assert_eq!(draft.validate().unwrap().as_str(), "resort-2026");
    }

    #[test]
    fn test_draft_rejects_blank_name() {
        let draft: CollectionDraft = serde_json::from_str(r#"{"name":" "}"#).unwrap();
        assert_eq!(draft.validate(), Err(CollectionValidationError::EmptyName));
    }
}
