//! Row shapes as stored in PostgreSQL and their view-model projections.
//!
//! Every conversion is total. Nullable columns become `None`, empty
//! collections or the type's default, and text enums the code does not
//! recognize project to the enum's default variant.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::account::Profile;
use crate::catalog::{
    Category, Collection, Order, OrderItem, Product, ProductVariant, Review, ShippingAddress,
};
use crate::types::{
    CategoryId, CollectionId, OrderId, OrderItemId, ProductId, ReviewId, UserId, VariantId,
};

/// Shown when a review was left without a name.
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

fn parse_or_default<T: FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

/// `products` row with aggregated membership arrays.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductRow {
    pub id: i32,
    pub slug: String,
    pub sku: Option<String>,
    pub name: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_new: Option<bool>,
    pub is_bestseller: Option<bool>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub allow_backorder: Option<bool>,
    pub category_ids: Option<Vec<i32>>,
    pub collection_ids: Option<Vec<i32>>,
    pub published: Option<bool>,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `product_variants` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct VariantRow {
    pub id: i32,
    pub product_id: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub sku: Option<String>,
    pub stock_quantity: Option<i32>,
    pub price: Option<Decimal>,
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: VariantId::new(row.id),
            size: row.size,
            color: row.color,
            sku: row.sku,
            stock_quantity: row.stock_quantity.unwrap_or_default(),
            price: row.price,
        }
    }
}

impl From<(ProductRow, Vec<VariantRow>)> for Product {
    fn from((row, variants): (ProductRow, Vec<VariantRow>)) -> Self {
        Self {
            id: ProductId::new(row.id),
            slug: row.slug,
            sku: row.sku,
            name: row.name,
            short_description: row.short_description,
            description: row.description,
            images: row.images.unwrap_or_default(),
            is_featured: row.is_featured.unwrap_or_default(),
            is_new: row.is_new.unwrap_or_default(),
            is_bestseller: row.is_bestseller.unwrap_or_default(),
            price: row.price,
            sale_price: row.sale_price,
            compare_at_price: row.compare_at_price,
            stock_quantity: row.stock_quantity.unwrap_or_default(),
            allow_backorder: row.allow_backorder.unwrap_or_default(),
            category_ids: row
                .category_ids
                .unwrap_or_default()
                .into_iter()
                .map(CategoryId::new)
                .collect(),
            collection_ids: row
                .collection_ids
                .unwrap_or_default()
                .into_iter()
                .map(CollectionId::new)
                .collect(),
            variants: variants.into_iter().map(ProductVariant::from).collect(),
            published: row.published.unwrap_or_default(),
            display_order: row.display_order.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Attach variants to their products, keeping product order.
///
/// Variants whose product is not in `rows` are dropped.
#[must_use]
pub fn assemble_products(rows: Vec<ProductRow>, variants: Vec<VariantRow>) -> Vec<Product> {
    let mut by_product: HashMap<i32, Vec<VariantRow>> = HashMap::new();
    for variant in variants {
        by_product.entry(variant.product_id).or_default().push(variant);
    }
    rows.into_iter()
        .map(|row| {
            let variants = by_product.remove(&row.id).unwrap_or_default();
            Product::from((row, variants))
        })
        .collect()
}

/// `categories` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CategoryRow {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<i32>,
    pub show_in_menu: Option<bool>,
    pub display_order: Option<i32>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            slug: row.slug,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            parent_id: row.parent_id.map(CategoryId::new),
            show_in_menu: row.show_in_menu.unwrap_or(true),
            display_order: row.display_order.unwrap_or_default(),
        }
    }
}

/// `collections` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CollectionRow {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub collection_type: Option<String>,
    pub published: Option<bool>,
    pub display_order: Option<i32>,
    /// Member ids by position; absent from admin queries.
    #[cfg_attr(feature = "postgres", sqlx(default))]
    pub product_ids: Vec<i32>,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        Self {
            id: CollectionId::new(row.id),
            slug: row.slug,
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            collection_type: parse_or_default(row.collection_type.as_deref()),
            published: row.published.unwrap_or_default(),
            display_order: row.display_order.unwrap_or_default(),
            product_ids: row.product_ids.into_iter().map(ProductId::new).collect(),
        }
    }
}

/// `orders` row.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderRow {
    pub id: i32,
    pub order_number: String,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub subtotal: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub total: Option<Decimal>,
    /// `jsonb`; anything that does not look like an address projects to `None`.
    pub shipping_address: Option<serde_json::Value>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `order_items` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub product_id: Option<i32>,
    pub product_name: String,
    pub product_slug: Option<String>,
    pub product_image: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        let quantity = row.quantity.unwrap_or_default();
        let unit_price = row.unit_price.unwrap_or_default();
        Self {
            id: OrderItemId::new(row.id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            product_slug: row.product_slug.unwrap_or_default(),
            product_image: row.product_image,
            size: row.size,
            color: row.color,
            quantity,
            unit_price,
            total_price: row
                .total_price
                .unwrap_or_else(|| unit_price * Decimal::from(quantity)),
        }
    }
}

impl From<(OrderRow, Vec<OrderItemRow>)> for Order {
    fn from((row, items): (OrderRow, Vec<OrderItemRow>)) -> Self {
        let shipping_address = row
            .shipping_address
            .filter(serde_json::Value::is_object)
            .and_then(|value| serde_json::from_value::<ShippingAddress>(value).ok());

        Self {
            id: OrderId::new(row.id),
            order_number: row.order_number,
            user_id: row.user_id.map(UserId::from),
            email: row.email,
            status: parse_or_default(row.status.as_deref()),
            payment_status: parse_or_default(row.payment_status.as_deref()),
            subtotal: row.subtotal.unwrap_or_default(),
            shipping: row.shipping.unwrap_or_default(),
            tax: row.tax.unwrap_or_default(),
            total: row.total.unwrap_or_default(),
            shipping_address,
            tracking_number: row.tracking_number,
            notes: row.notes,
            items: items.into_iter().map(OrderItem::from).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Attach items to their orders, keeping order sequence.
#[must_use]
pub fn assemble_orders(rows: Vec<OrderRow>, items: Vec<OrderItemRow>) -> Vec<Order> {
    let mut by_order: HashMap<i32, Vec<OrderItemRow>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }
    rows.into_iter()
        .map(|row| {
            let items = by_order.remove(&row.id).unwrap_or_default();
            Order::from((row, items))
        })
        .collect()
}

/// `reviews` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ReviewRow {
    pub id: i32,
    pub product_id: i32,
    pub user_id: Option<Uuid>,
    pub rating: Option<i16>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub reviewer_name: Option<String>,
    pub approved: Option<bool>,
    pub featured: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            product_id: ProductId::new(row.product_id),
            user_id: row.user_id.map(UserId::from),
            rating: row.rating.unwrap_or_default(),
            title: row.title,
            body: row.body.unwrap_or_default(),
            reviewer_name: row
                .reviewer_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_REVIEWER.to_string()),
            approved: row.approved.unwrap_or_default(),
            featured: row.featured.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// `profiles` row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: UserId::from(row.id),
            email: row.email,
            full_name: row.full_name,
            role: parse_or_default(row.role.as_deref()),
        }
    }
}
