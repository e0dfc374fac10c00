use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A saved product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// Saved products, oldest first, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistState {
    items: Vec<WishlistItem>,
}

impl WishlistState {
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.items.iter().map(|item| item.product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Returns `false` if the product was already saved.
    pub fn add(&mut self, product_id: ProductId, now: DateTime<Utc>) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.items.push(WishlistItem {
            product_id,
            added_at: now,
        });
        true
    }

    /// Returns `false` if the product was not saved.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != before
    }

    /// Add if absent, remove if present. Returns whether it is saved now.
    pub fn toggle(&mut self, product_id: ProductId, now: DateTime<Utc>) -> bool {
        if self.remove(product_id) {
            false
        } else {
            self.add(product_id, now)
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }
}
