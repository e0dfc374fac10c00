//! Category model and the parent/child forest.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{CategoryId, Slug, SlugError};

/// A node in the category forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub show_in_menu: bool,
    pub display_order: i32,
}

/// A category with its children, for navigation menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Find a category by slug.
#[must_use]
pub fn find_by_slug<'a>(categories: &'a [Category], slug: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.slug == slug)
}

/// The given category plus every category below it.
///
/// Parent links are not guaranteed acyclic, so the walk tracks visited ids
/// and terminates on any shape of input.
#[must_use]
pub fn descendant_ids(categories: &[Category], root: CategoryId) -> HashSet<CategoryId> {
    let mut children: HashMap<CategoryId, Vec<CategoryId>> = HashMap::new();
    for category in categories {
        if let Some(parent) = category.parent_id {
            children.entry(parent).or_default().push(category.id);
        }
    }

    let mut seen = HashSet::from([root]);
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        for child in children.get(&id).into_iter().flatten() {
            if seen.insert(*child) {
                stack.push(*child);
            }
        }
    }
    seen
}

/// Build the navigation tree from menu-visible categories.
///
/// Roots are categories without a parent, or whose parent is hidden or
/// missing. Siblings are ordered by `display_order`, then name. Categories
/// trapped in a parent cycle never reach a root and are left out.
#[must_use]
pub fn menu_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let visible: Vec<&Category> = categories.iter().filter(|c| c.show_in_menu).collect();
    let visible_ids: HashSet<CategoryId> = visible.iter().map(|c| c.id).collect();

    let mut by_parent: HashMap<Option<CategoryId>, Vec<&Category>> = HashMap::new();
    for category in &visible {
        let parent = category.parent_id.filter(|p| visible_ids.contains(p));
        by_parent.entry(parent).or_default().push(category);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    let mut seen = HashSet::new();
    build_level(&by_parent, None, &mut seen)
}

fn build_level(
    by_parent: &HashMap<Option<CategoryId>, Vec<&Category>>,
    parent: Option<CategoryId>,
    seen: &mut HashSet<CategoryId>,
) -> Vec<CategoryNode> {
    let Some(siblings) = by_parent.get(&parent) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(siblings.len());
    for category in siblings {
        if !seen.insert(category.id) {
            continue;
        }
        nodes.push(CategoryNode {
            category: (*category).clone(),
            children: build_level(by_parent, Some(category.id), seen),
        });
    }
    nodes
}

/// Validation failures for category writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryValidationError {
    #[error("category name is required")]
    EmptyName,
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),
    #[error("a category cannot be its own parent")]
    SelfParent,
}

/// Write shape for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default = "default_true")]
    pub show_in_menu: bool,
    #[serde(default)]
    pub display_order: i32,
}

const fn default_true() -> bool {
    true
}

impl CategoryDraft {
    /// Check the draft and resolve the slug to store.
    ///
    /// `id` is the category being updated, if any.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self, id: Option<CategoryId>) -> Result<Slug, CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if id.is_some() && self.parent_id == id {
            return Err(CategoryValidationError::SelfParent);
        }

        let slug = match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => Slug::parse(slug)?,
            _ => Slug::from_name(name)?,
        };
        Ok(slug)
    }
}
