//! Catalog domain: products, categories, collections, orders, reviews and
//! the listing resolver.

pub mod category;
pub mod collection;
pub mod order;
pub mod product;
pub mod query;
pub mod review;

pub use category::{Category, CategoryDraft, CategoryNode, CategoryValidationError};
pub use collection::{Collection, CollectionDraft, CollectionValidationError};
pub use order::{Order, OrderItem, OrderSummary, OrderUpdate, ShippingAddress};
pub use product::{
    PriceDisplay, Product, ProductCard, ProductDraft, ProductValidationError, ProductVariant,
    VariantDraft,
};
pub use query::{
    CatalogParams, CatalogQuery, CatalogSnapshot, FilterSpec, InMemoryProductStore, ProductPage,
    ProductStore, SortKey, related_products,
};
pub use review::{Review, ReviewModeration, ReviewSummary};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::Product;
    use crate::types::ProductId;

    /// A published, in-stock product with no variants or memberships.
    ///
    /// `created_at` grows with `id`.
    pub fn product(id: i32, price: i64) -> Product {
        let created_at = Utc
            .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_default()
            + Duration::days(i64::from(id));
        Product {
            id: ProductId::new(id),
            slug: format!("product-{id}"),
            sku: None,
            name: format!("Product {id}"),
            short_description: None,
            description: None,
            images: vec![],
            is_featured: false,
            is_new: false,
            is_bestseller: false,
            price: Decimal::new(price, 0),
            sale_price: None,
            compare_at_price: None,
            stock_quantity: 5,
            allow_backorder: false,
            category_ids: vec![],
            collection_ids: vec![],
            variants: vec![],
            published: true,
            display_order: 0,
            created_at,
            updated_at: created_at,
        }
    }
}
