use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::ProductId;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Identifies a cart line: a product in a chosen size and color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineKey {
    pub product_id: ProductId,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A product in the cart with a snapshot of its display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// Snapshot `product` at its current effective price.
    #[must_use]
    pub fn from_product(
        product: &Product,
        size: Option<String>,
        color: Option<String>,
        quantity: u32,
    ) -> Self {
        let variant_price = product
            .variants
            .iter()
            .find(|v| v.size == size && v.color == color)
            .and_then(|v| v.price);
        Self {
            product_id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_owned),
            size,
            color,
            unit_price: variant_price.unwrap_or_else(|| product.effective_price()),
            quantity,
        }
    }

    #[must_use]
    pub fn key(&self) -> CartLineKey {
        CartLineKey {
            product_id: self.product_id,
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    fn is(&self, key: &CartLineKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Shopping cart, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    lines: Vec<CartLine>,
}

impl CartState {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &CartLineKey) -> bool {
        self.lines.iter().any(|line| line.is(key))
    }

    /// Add a line, merging into an existing line with the same key.
    ///
    /// Quantities are capped at [`MAX_LINE_QUANTITY`]; a zero quantity is a
    /// no-op.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        let key = line.key();
        if let Some(existing) = self.lines.iter_mut().find(|l| l.is(&key)) {
            existing.quantity = existing
                .quantity
                .saturating_add(line.quantity)
                .min(MAX_LINE_QUANTITY);
            existing.unit_price = line.unit_price;
        } else {
            self.lines.push(CartLine {
                quantity: line.quantity.min(MAX_LINE_QUANTITY),
                ..line
            });
        }
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// Returns `false` when no such line exists.
    pub fn update_quantity(&mut self, key: &CartLineKey, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(key);
        }
        match self.lines.iter_mut().find(|l| l.is(key)) {
            Some(line) => {
                line.quantity = quantity.min(MAX_LINE_QUANTITY);
                true
            }
            None => false,
        }
    }

    /// Returns `false` when no such line exists.
    pub fn remove(&mut self, key: &CartLineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.is(key));
        self.lines.len() != before
    }

    /// Remove the line if present, otherwise add it.
    ///
    /// Returns whether the line is in the cart afterwards.
    pub fn toggle(&mut self, line: CartLine) -> bool {
        if self.remove(&line.key()) {
            false
        } else {
            self.add(line);
            true
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::ProductVariant;
    use crate::catalog::test_support::product;
    use crate::types::VariantId;

    fn line(id: i32, size: &str, quantity: u32) -> CartLine {
        CartLine::from_product(&product(id, 100), Some(size.to_string()), None, quantity)
    }

    #[test]
    fn test_add_merges_same_key() {
        let mut cart = CartState::default();
        cart.add(line(1, "M", 1));
        cart.add(line(1, "M", 2));
        cart.add(line(1, "L", 1));
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.count(), 4);
        assert_eq!(cart.subtotal(), Decimal::new(400, 0));
    }

    #[test]
    fn test_add_caps_quantity() {
        let mut cart = CartState::default();
        cart.add(line(1, "M", 90));
        cart.add(line(1, "M", 90));
        assert_eq!(cart.count(), MAX_LINE_QUANTITY);
        cart.add(line(2, "M", 0));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_update_zero_removes() {
        let mut cart = CartState::default();
        cart.add(line(1, "M", 2));
        let key = cart.lines()[0].key();
        assert!(cart.update_quantity(&key, 5));
        assert_eq!(cart.count(), 5);
        assert!(cart.update_quantity(&key, 0));
        assert!(cart.is_empty());
        assert!(!cart.update_quantity(&key, 1));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut cart = CartState::default();
        cart.add(line(2, "S", 1));
        let before = cart.clone();
        assert!(cart.toggle(line(1, "M", 1)));
        assert!(!cart.toggle(line(1, "M", 1)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_variant_price_overrides_product() {
        let mut p = product(1, 100);
        p.sale_price = Some(Decimal::new(80, 0));
        p.variants.push(ProductVariant {
            id: VariantId::new(1),
            size: Some("XL".to_string()),
            color: None,
            sku: None,
            stock_quantity: 1,
            price: Some(Decimal::new(120, 0)),
        });
        let xl = CartLine::from_product(&p, Some("XL".to_string()), None, 1);
        let s = CartLine::from_product(&p, Some("S".to_string()), None, 1);
        assert_eq!(xl.unit_price, Decimal::new(120, 0));
        assert_eq!(s.unit_price, Decimal::new(80, 0));
    }

    #[test]
    fn test_clear() {
        let mut cart = CartState::default();
        cart.add(line(1, "M", 1));
        cart.clear();
        assert_eq!(cart.count(), 0);
    }
}
