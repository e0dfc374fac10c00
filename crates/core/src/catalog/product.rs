//! Product and variant model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{
    CategoryId, CollectionId, CurrencyCode, ProductId, Slug, SlugError, VariantId,
    discount_percent, format_price,
};

/// A catalog product.
///
/// `category_ids` is the single source of category membership; the first
/// entry is treated as the primary category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub sku: Option<String>,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub is_new: bool,
    pub is_bestseller: bool,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub stock_quantity: i32,
    pub allow_backorder: bool,
    pub category_ids: Vec<CategoryId>,
    pub collection_ids: Vec<CollectionId>,
    pub variants: Vec<ProductVariant>,
    pub published: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchasable size/color combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    pub size: Option<String>,
    pub color: Option<String>,
    pub sku: Option<String>,
    pub stock_quantity: i32,
    /// Overrides the product price when set.
    pub price: Option<Decimal>,
}

impl Product {
    /// Sale price if set, otherwise list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// Whether a sale price undercuts the list price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.price)
    }

    /// Whether the product or any of its variants has stock on hand.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0 || self.variants.iter().any(|v| v.stock_quantity > 0)
    }

    /// Whether the product can be added to a cart right now.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.published && (self.is_in_stock() || self.allow_backorder)
    }

    /// First category the product belongs to.
    #[must_use]
    pub fn primary_category(&self) -> Option<CategoryId> {
        self.category_ids.first().copied()
    }

    /// First image, used for cards and cart lines.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether any variant has the given size (case-insensitive).
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.variants
            .iter()
            .filter_map(|v| v.size.as_deref())
            .any(|s| s.eq_ignore_ascii_case(size))
    }

    /// Whether any variant has the given color (case-insensitive).
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.variants
            .iter()
            .filter_map(|v| v.color.as_deref())
            .any(|c| c.eq_ignore_ascii_case(color))
    }

    /// Price display fields for product cards.
    #[must_use]
    pub fn price_display(&self) -> PriceDisplay {
        PriceDisplay {
            price: format_price(self.effective_price(), CurrencyCode::USD),
            original_price: self
                .is_on_sale()
                .then(|| format_price(self.price, CurrencyCode::USD))
                .or_else(|| {
                    self.compare_at_price
                        .filter(|compare| *compare > self.effective_price())
                        .map(|compare| format_price(compare, CurrencyCode::USD))
                }),
            discount_percent: discount_percent(self.price, self.sale_price),
        }
    }
}

/// Formatted prices for a product card or detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDisplay {
    /// What the customer pays.
    pub price: String,
    /// Struck-through reference price, if any.
    pub original_price: Option<String>,
    pub discount_percent: Option<u32>,
}

/// Compact product view for grids, related items and the wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub image: Option<String>,
    pub price: PriceDisplay,
    pub is_new: bool,
    pub is_bestseller: bool,
    pub is_on_sale: bool,
    pub in_stock: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            image: product.primary_image().map(str::to_owned),
            price: product.price_display(),
            is_new: product.is_new,
            is_bestseller: product.is_bestseller,
            is_on_sale: product.is_on_sale(),
            in_stock: product.is_in_stock(),
        }
    }
}

/// Validation failures for product writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    #[error("product name is required")]
    EmptyName,
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),
    #[error("price cannot be negative")]
    NegativePrice,
    #[error("sale price cannot exceed the regular price")]
    SalePriceAboveList,
    #[error("stock quantity cannot be negative")]
    NegativeStock,
    #[error("variant {index} has negative stock")]
    NegativeVariantStock { index: usize },
    #[error("variant {index} has a negative price")]
    NegativeVariantPrice { index: usize },
}

/// Write shape for creating or replacing a product.
///
/// Used by the admin API and the catalog seed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    pub price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub allow_backorder: bool,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
    #[serde(default)]
    pub variants: Vec<VariantDraft>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// Write shape for a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl ProductDraft {
    /// Check the product invariants and resolve the slug to store.
    ///
    /// A blank slug is generated from the name.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<Slug, ProductValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::EmptyName);
        }

        let slug = match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => Slug::parse(slug)?,
            _ => Slug::from_name(name)?,
        };

        if self.price < Decimal::ZERO {
            return Err(ProductValidationError::NegativePrice);
        }
        if let Some(sale) = self.sale_price {
            if sale < Decimal::ZERO {
                return Err(ProductValidationError::NegativePrice);
            }
            if sale > self.price {
                return Err(ProductValidationError::SalePriceAboveList);
            }
        }
        if self.stock_quantity < 0 {
            return Err(ProductValidationError::NegativeStock);
        }

        for (index, variant) in self.variants.iter().enumerate() {
            if variant.stock_quantity < 0 {
                return Err(ProductValidationError::NegativeVariantStock { index });
            }
            if variant.price.is_some_and(|p| p < Decimal::ZERO) {
                return Err(ProductValidationError::NegativeVariantPrice { index });
            }
        }

        Ok(slug)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Silk Evening Gown".to_string(),
            slug: None,
            sku: Some("SEG-001".to_string()),
            short_description: None,
            description: None,
            images: vec![],
            is_featured: false,
            is_new: false,
            is_bestseller: false,
            price: Decimal::new(1200, 0),
            sale_price: None,
            compare_at_price: None,
            stock_quantity: 3,
            allow_backorder: false,
            category_ids: vec![],
            variants: vec![],
            published: true,
            display_order: 0,
        }
    }

    #[test]
    fn test_effective_price_prefers_sale() {
        let mut p = product(1, 100);
        assert_eq!(p.effective_price(), Decimal::new(100, 0));
        p.sale_price = Some(Decimal::new(80, 0));
        assert_eq!(p.effective_price(), Decimal::new(80, 0));
        assert!(p.is_on_sale());
    }

    #[test]
    fn test_in_stock_through_variant() {
        let mut p = product(1, 100);
        p.stock_quantity = 0;
        assert!(!p.is_in_stock());
        p.variants.push(ProductVariant {
            id: VariantId::new(1),
            size: Some("M".to_string()),
            color: None,
            sku: None,
            stock_quantity: 2,
            price: None,
        });
        assert!(p.is_in_stock());
        assert!(p.has_size("m"));
        assert!(!p.has_color("black"));
    }

    #[test]
    fn test_price_display_on_sale() {
        let mut p = product(1, 200);
        p.sale_price = Some(Decimal::new(150, 0));
        let display = p.price_display();
        assert_eq!(display.price, "$150.00");
        assert_eq!(display.original_price.as_deref(), Some("$200.00"));
        assert_eq!(display.discount_percent, Some(25));
    }

    #[test]
    fn test_price_display_compare_at() {
        let mut p = product(1, 200);
        p.compare_at_price = Some(Decimal::new(260, 0));
        let display = p.price_display();
        assert_eq!(display.original_price.as_deref(), Some("$260.00"));
        assert_eq!(display.discount_percent, None);
    }

    #[test]
    fn test_card_uses_first_image() {
        let mut p = product(1, 90);
        p.images = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let card = ProductCard::from(&p);
        assert_eq!(card.image.as_deref(), Some("a.jpg"));
        assert_eq!(card.price.price, "$90.00");
        assert!(card.in_stock);
    }

    #[test]
    fn test_validate_generates_slug() {
        assert_eq!(draft().validate().unwrap().as_str(), "silk-evening-gown");
    }

    #[test]
    fn test_validate_sale_price_above_list() {
        let mut d = draft();
        d.sale_price = Some(Decimal::new(1300, 0));
        assert_eq!(d.validate(), Err(ProductValidationError::SalePriceAboveList));
    }

    #[test]
    fn test_validate_negative_stock() {
        let mut d = draft();
        d.stock_quantity = -1;
        assert_eq!(d.validate(), Err(ProductValidationError::NegativeStock));

        let mut d = draft();
        d.variants.push(VariantDraft {
            size: Some("S".to_string()),
            color: None,
            sku: None,
            stock_quantity: -2,
            price: None,
        });
        assert_eq!(
            d.validate(),
            Err(ProductValidationError::NegativeVariantStock { index: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_blank_name_and_bad_slug() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert_eq!(d.validate(), Err(ProductValidationError::EmptyName));

        let mut d = draft();
        d.slug = Some("Not A Slug".to_string());
        assert!(matches!(
            d.validate(),
            Err(ProductValidationError::InvalidSlug(_))
        ));
    }

    #[test]
    fn test_draft_deserializes_with_defaults() {
        let d: ProductDraft =
            serde_json::from_str(r#"{"name":"Scarf","price":"95.00"}"#).unwrap();
        assert_eq!(d.price, Decimal::new(9500, 2));
        assert!(!d.published);
        assert!(d.variants.is_empty());
    }
}
