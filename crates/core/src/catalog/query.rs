//! Catalog filtering, sorting and pagination.
//!
//! The resolver is a pure function over a [`CatalogSnapshot`]. It never
//! fails: unknown sort keys fall back to [`SortKey::Featured`], a zero limit
//! is clamped to one, unknown category or collection slugs match nothing and
//! a page past the end is simply empty.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{self, Category};
use super::collection::{self, Collection};
use super::product::Product;
use crate::types::{CategoryId, CollectionId, ProductId};

/// Default number of products per storefront page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size the HTTP routes accept.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filter predicates. Every supplied predicate must hold.
///
/// Empty `sizes`/`colors` and blank strings count as "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub category: Option<String>,
    pub collection: Option<String>,
    /// Inclusive lower bound on the effective price.
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound on the effective price.
    pub max_price: Option<Decimal>,
    /// Matches when any variant has any of these sizes.
    pub sizes: Vec<String>,
    /// Matches when any variant has any of these colors.
    pub colors: Vec<String>,
    pub in_stock_only: bool,
    pub on_sale: bool,
    pub new_arrivals: bool,
    /// Case-insensitive substring of name or short description.
    pub search: Option<String>,
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Featured products first, then display order.
    #[default]
    Featured,
    /// Most recently created first.
    Newest,
    /// Cheapest effective price first.
    PriceAsc,
    /// Most expensive effective price first.
    PriceDesc,
    /// Bestsellers first, then display order.
    Bestseller,
    /// Case-insensitive name order.
    NameAsc,
}

impl SortKey {
    pub const ALL: [Self; 6] = [
        Self::Featured,
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Bestseller,
        Self::NameAsc,
    ];

    /// Query-string form, e.g. `price-asc`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Bestseller => "bestseller",
            Self::NameAsc => "name-asc",
        }
    }

    /// Parse a query-string value, falling back to `Featured` for anything
    /// unrecognized.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        let primary = match self {
            Self::Featured => b
                .is_featured
                .cmp(&a.is_featured)
                .then_with(|| a.display_order.cmp(&b.display_order)),
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::PriceAsc => a.effective_price().cmp(&b.effective_price()),
            Self::PriceDesc => b.effective_price().cmp(&a.effective_price()),
            Self::Bestseller => b
                .is_bestseller
                .cmp(&a.is_bestseller)
                .then_with(|| a.display_order.cmp(&b.display_order)),
            Self::NameAsc => a
                .name
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.name.chars().flat_map(char::to_lowercase)),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Everything the resolver needs, captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub collections: Vec<Collection>,
}

/// One page of resolved products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// Number of matching products across all pages.
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
}

/// A filter, sort and page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub sort: SortKey,
    /// 1-based; 0 is read as 1.
    pub page: u32,
    /// Clamped to at least 1.
    pub limit: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            filters: FilterSpec::default(),
            sort: SortKey::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogQuery {
    /// First page of `filters` in the default order.
    #[must_use]
    pub fn new(filters: FilterSpec) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Resolve against published products only.
    #[must_use]
    pub fn run(&self, snapshot: &CatalogSnapshot) -> ProductPage {
        self.resolve(snapshot, true, &[])
    }

    /// Resolve against published products, placing products listed in
    /// `curated` first in that order. Unlisted matches follow in the sort
    /// key order.
    #[must_use]
    pub fn run_curated(&self, snapshot: &CatalogSnapshot, curated: &[ProductId]) -> ProductPage {
        self.resolve(snapshot, true, curated)
    }

    /// Resolve against every product, drafts included. Used by the admin
    /// product table.
    #[must_use]
    pub fn run_unrestricted(&self, snapshot: &CatalogSnapshot) -> ProductPage {
        self.resolve(snapshot, false, &[])
    }

    fn resolve(
        &self,
        snapshot: &CatalogSnapshot,
        published_only: bool,
        curated: &[ProductId],
    ) -> ProductPage {
        let matcher = Matcher::new(&self.filters, snapshot);

        let mut matches: Vec<&Product> = snapshot
            .products
            .iter()
            .filter(|p| !published_only || p.published)
            .filter(|p| matcher.matches(p))
            .collect();
        let rank: HashMap<ProductId, usize> = curated
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position))
            .collect();
        let rank_of = |p: &Product| rank.get(&p.id).copied().unwrap_or(usize::MAX);
        matches.sort_by(|a, b| {
            rank_of(a)
                .cmp(&rank_of(b))
                .then_with(|| self.sort.compare(a, b))
        });

        let page = self.page.max(1);
        let limit = self.limit.max(1);
        let total = matches.len();
        let offset = (page as usize - 1).saturating_mul(limit as usize);

        let items = matches
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect();

        ProductPage {
            items,
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit as usize),
        }
    }
}

/// Resolve one page of published products.
#[must_use]
pub fn query(
    snapshot: &CatalogSnapshot,
    filters: FilterSpec,
    sort: SortKey,
    page: u32,
    limit: u32,
) -> ProductPage {
    CatalogQuery {
        filters,
        sort,
        page,
        limit,
    }
    .run(snapshot)
}

/// Published products sharing `product`'s primary category, best first.
#[must_use]
pub fn related_products<'a>(
    products: &'a [Product],
    product: &Product,
    limit: usize,
) -> Vec<&'a Product> {
    let Some(primary) = product.primary_category() else {
        return Vec::new();
    };
    let mut related: Vec<&Product> = products
        .iter()
        .filter(|p| p.published && p.id != product.id && p.category_ids.contains(&primary))
        .collect();
    related.sort_by(|a, b| SortKey::Featured.compare(a, b));
    related.truncate(limit);
    related
}

/// Listing query string as sent by the storefront and admin tables.
///
/// Every field is kept as text and read leniently: values that do not
/// parse are treated as absent so a listing request never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogParams {
    pub category: Option<String>,
    pub collection: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Comma-separated.
    pub sizes: Option<String>,
    /// Comma-separated.
    pub colors: Option<String>,
    pub in_stock: Option<String>,
    pub on_sale: Option<String>,
    #[serde(rename = "new")]
    pub new_arrivals: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl CatalogParams {
    /// Build a query, using `default_limit` when none is given and capping
    /// the limit at [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn into_query(self, default_limit: u32) -> CatalogQuery {
        let filters = FilterSpec {
            category: self.category,
            collection: self.collection,
            min_price: parse_param(self.min_price.as_deref()),
            max_price: parse_param(self.max_price.as_deref()),
            sizes: split_list(self.sizes.as_deref()),
            colors: split_list(self.colors.as_deref()),
            in_stock_only: flag(self.in_stock.as_deref()),
            on_sale: flag(self.on_sale.as_deref()),
            new_arrivals: flag(self.new_arrivals.as_deref()),
            search: self.q,
        };
        let limit = parse_param(self.limit.as_deref())
            .unwrap_or(default_limit)
            .min(MAX_PAGE_SIZE);

        CatalogQuery {
            filters,
            sort: self
                .sort
                .as_deref()
                .map(SortKey::from_param)
                .unwrap_or_default(),
            page: parse_param(self.page.as_deref()).unwrap_or(1),
            limit,
        }
    }
}

fn parse_param<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

fn flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "on" | "yes")
    )
}

/// Filter predicates with slugs resolved and text normalized.
struct Matcher<'a> {
    filters: &'a FilterSpec,
    /// `Some(empty)` when the slug is unknown, which matches nothing.
    categories: Option<HashSet<CategoryId>>,
    collection: Option<Option<CollectionId>>,
    sizes: Vec<&'a str>,
    colors: Vec<&'a str>,
    search: Option<String>,
}

impl<'a> Matcher<'a> {
    fn new(filters: &'a FilterSpec, snapshot: &CatalogSnapshot) -> Self {
        let categories = non_blank(filters.category.as_deref()).map(|slug| {
            category::find_by_slug(&snapshot.categories, slug)
                .map(|root| category::descendant_ids(&snapshot.categories, root.id))
                .unwrap_or_default()
        });
        let collection = non_blank(filters.collection.as_deref())
            .map(|slug| collection::find_by_slug(&snapshot.collections, slug).map(|c| c.id));

        Self {
            filters,
            categories,
            collection,
            sizes: non_blank_values(&filters.sizes),
            colors: non_blank_values(&filters.colors),
            search: non_blank(filters.search.as_deref()).map(str::to_lowercase),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(ids) = &self.categories
            && !product.category_ids.iter().any(|id| ids.contains(id))
        {
            return false;
        }
        if let Some(collection) = self.collection
            && !collection.is_some_and(|id| product.collection_ids.contains(&id))
        {
            return false;
        }

        let price = product.effective_price();
        if self.filters.min_price.is_some_and(|min| price < min)
            || self.filters.max_price.is_some_and(|max| price > max)
        {
            return false;
        }

        if !self.sizes.is_empty() && !self.sizes.iter().any(|s| product.has_size(s)) {
            return false;
        }
        if !self.colors.is_empty() && !self.colors.iter().any(|c| product.has_color(c)) {
            return false;
        }

        if self.filters.in_stock_only && !product.is_in_stock() {
            return false;
        }
        if self.filters.on_sale && !product.is_on_sale() {
            return false;
        }
        if self.filters.new_arrivals && !product.is_new {
            return false;
        }

        self.search.as_deref().is_none_or(|needle| {
            product.name.to_lowercase().contains(needle)
                || product
                    .short_description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(needle))
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_blank_values(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Source of catalog data for the resolver.
pub trait ProductStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every published product, variants and memberships included.
    fn list_published(&self) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;

    /// Every category.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send;

    /// Every published collection.
    fn list_collections(
        &self,
    ) -> impl Future<Output = Result<Vec<Collection>, Self::Error>> + Send;

    /// Load a snapshot the resolver can run against.
    fn snapshot(&self) -> impl Future<Output = Result<CatalogSnapshot, Self::Error>> + Send {
        async move {
            Ok(CatalogSnapshot {
                products: self.list_published().await?,
                categories: self.list_categories().await?,
                collections: self.list_collections().await?,
            })
        }
    }
}

/// A fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductStore {
    snapshot: CatalogSnapshot,
}

impl InMemoryProductStore {
    #[must_use]
    pub const fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }
}

impl ProductStore for InMemoryProductStore {
    type Error = Infallible;

    async fn list_published(&self) -> Result<Vec<Product>, Self::Error> {
        Ok(self
            .snapshot
            .products
            .iter()
            .filter(|p| p.published)
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        Ok(self.snapshot.categories.clone())
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, Self::Error> {
        Ok(self
            .snapshot
            .collections
            .iter()
            .filter(|c| c.published)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::catalog::product::ProductVariant;
    use crate::catalog::test_support::product;
    use crate::types::{CollectionType, ProductId, VariantId};

    fn ids(page: &ProductPage) -> Vec<i32> {
        page.items.iter().map(|p| p.id.as_i32()).collect()
    }

    fn variant(id: i32, size: &str, color: &str, stock: i32) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(id),
            size: Some(size.to_string()),
            color: Some(color.to_string()),
            sku: None,
            stock_quantity: stock,
            price: None,
        }
    }

    fn category(id: i32, slug: &str, parent: Option<i32>) -> Category {
        Category {
            id: CategoryId::new(id),
            slug: slug.to_string(),
            name: slug.to_string(),
            description: None,
            image_url: None,
            parent_id: parent.map(CategoryId::new),
            show_in_menu: true,
            display_order: 0,
        }
    }

    /// Ten products priced 10..=100 with products 3 and 6 out of stock.
    fn priced_catalog() -> CatalogSnapshot {
        let products = (1..=10)
            .map(|i| {
                let mut p = product(i, i64::from(i) * 10);
                if i == 3 || i == 6 {
                    p.stock_quantity = 0;
                }
                p
            })
            .collect();
        CatalogSnapshot {
            products,
            ..CatalogSnapshot::default()
        }
    }

    /// A catalog exercising every filter dimension.
    fn mixed_catalog() -> CatalogSnapshot {
        let mut gown = product(1, 1200);
        gown.name = "Silk Evening Gown".to_string();
        gown.category_ids = vec![CategoryId::new(3)];
        gown.collection_ids = vec![CollectionId::new(1)];
        gown.variants = vec![variant(1, "S", "Black", 1), variant(2, "M", "Ivory", 0)];
        gown.is_new = true;

        let mut coat = product(2, 2400);
        coat.name = "Cashmere Coat".to_string();
        coat.short_description = Some("Double-faced silk lining".to_string());
        coat.category_ids = vec![CategoryId::new(2)];
        coat.sale_price = Some(Decimal::new(1800, 0));
        coat.variants = vec![variant(3, "L", "Camel", 2)];

        let mut bag = product(3, 900);
        bag.name = "Leather Tote".to_string();
        bag.category_ids = vec![CategoryId::new(4)];
        bag.stock_quantity = 0;
        bag.is_featured = true;

        let mut draft = product(4, 500);
        draft.name = "Unreleased Silk Scarf".to_string();
        draft.category_ids = vec![CategoryId::new(2)];
        draft.published = false;

        let mut scarf = product(5, 300);
        scarf.name = "Printed Scarf".to_string();
        scarf.category_ids = vec![CategoryId::new(4), CategoryId::new(2)];
        scarf.variants = vec![variant(4, "OS", "black", 4)];
        scarf.is_new = true;
        scarf.sale_price = Some(Decimal::new(300, 0));

        CatalogSnapshot {
            products: vec![gown, coat, bag, draft, scarf],
            categories: vec![
                category(1, "women", None),
                category(2, "clothing", Some(1)),
                category(3, "dresses", Some(2)),
                category(4, "accessories", None),
            ],
            collections: vec![Collection {
                id: CollectionId::new(1),
                slug: "evening".to_string(),
                name: "Evening".to_string(),
                description: None,
                image_url: None,
                collection_type: CollectionType::Style,
                published: true,
                display_order: 0,
                product_ids: vec![],
            }],
        }
    }

    fn all(filters: FilterSpec) -> CatalogQuery {
        CatalogQuery::new(filters).page(1, 100)
    }

    #[test]
    fn test_price_desc_in_stock_second_page() {
        let filters = FilterSpec {
            in_stock_only: true,
            ..FilterSpec::default()
        };
        let page = query(&priced_catalog(), filters, SortKey::PriceDesc, 2, 4);

        // In stock by price: 100 90 80 70 | 50 40 20 10
        assert_eq!(ids(&page), vec![5, 4, 2, 1]);
        assert_eq!(page.total, 8);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 4);
    }

    #[test]
    fn test_page_past_end_is_empty_with_same_totals() {
        let snapshot = priced_catalog();
        let first = CatalogQuery::default().page(1, 3).run(&snapshot);
        let beyond = CatalogQuery::default().page(9, 3).run(&snapshot);

        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, first.total);
        assert_eq!(beyond.total_pages, first.total_pages);
        assert_eq!(first.total_pages, 4);
    }

    #[test]
    fn test_zero_limit_and_page_are_clamped() {
        let page = CatalogQuery::default().page(0, 0).run(&priced_catalog());
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 10);
    }

    #[test]
    fn test_empty_catalog_has_no_pages() {
        let page = CatalogQuery::default().run(&CatalogSnapshot::default());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_unknown_sort_falls_back_to_featured() {
        assert_eq!(SortKey::from_param("cheapest"), SortKey::Featured);
        assert_eq!(SortKey::from_param(""), SortKey::Featured);
        assert_eq!(SortKey::from_param("price-desc"), SortKey::PriceDesc);
        assert_eq!(SortKey::from_param(" Name-Asc "), SortKey::NameAsc);
    }

    #[test]
    fn test_sort_key_serde_uses_param_form() {
        for key in SortKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_every_sort_is_total_and_repeatable() {
        let mut snapshot = priced_catalog();
        // Create ties on every primary key.
        for p in &mut snapshot.products {
            p.price = Decimal::new(50, 0);
            p.display_order = 0;
            p.name = "Same".to_string();
            p.created_at = snapshot_epoch();
        }
        snapshot.products.reverse();

        for key in SortKey::ALL {
            let query = CatalogQuery::default().sorted_by(key).page(1, 100);
            let first = query.run(&snapshot);
            let second = query.run(&snapshot);
            assert_eq!(ids(&first), ids(&second), "{key:?}");
            assert_eq!(ids(&first), (1..=10).collect::<Vec<_>>(), "{key:?}");
        }
    }

    fn snapshot_epoch() -> chrono::DateTime<chrono::Utc> {
        product(1, 1).created_at
    }

    #[test]
    fn test_sort_orders_follow_policy() {
        let mut snapshot = mixed_catalog();
        snapshot.products[2].display_order = 5;
        snapshot.products[0].is_bestseller = true;
        snapshot.products[4].created_at += Duration::days(30);
        let run = |key| all(FilterSpec::default()).sorted_by(key).run(&snapshot);

        // Featured bag first, the rest by display order then id.
        assert_eq!(ids(&run(SortKey::Featured)), vec![3, 1, 2, 5]);
        assert_eq!(ids(&run(SortKey::Bestseller)), vec![1, 2, 5, 3]);
        assert_eq!(ids(&run(SortKey::Newest)), vec![5, 3, 2, 1]);
        // Coat is 2400 on sale for 1800.
        assert_eq!(ids(&run(SortKey::PriceAsc)), vec![5, 3, 1, 2]);
        assert_eq!(ids(&run(SortKey::PriceDesc)), vec![2, 1, 3, 5]);
        assert_eq!(ids(&run(SortKey::NameAsc)), vec![2, 3, 5, 1]);
    }

    #[test]
    fn test_curated_members_lead_then_sort_key() {
        let snapshot = priced_catalog();
        let curated = [ProductId::new(7), ProductId::new(2), ProductId::new(99)];
        let query = CatalogQuery::new(FilterSpec::default()).sorted_by(SortKey::PriceDesc);

        let first = query.clone().page(1, 4).run_curated(&snapshot, &curated);
        assert_eq!(ids(&first), vec![7, 2, 10, 9]);
        assert_eq!(first.total, 10);

        let second = query.page(2, 4).run_curated(&snapshot, &curated);
        assert_eq!(ids(&second), vec![8, 6, 5, 4]);
    }

    #[test]
    fn test_unpublished_hidden_unless_unrestricted() {
        let snapshot = mixed_catalog();
        let published = all(FilterSpec::default()).run(&snapshot);
        assert!(!ids(&published).contains(&4));
        assert_eq!(published.total, 4);

        let everything = all(FilterSpec::default()).run_unrestricted(&snapshot);
        assert!(ids(&everything).contains(&4));
        assert_eq!(everything.total, 5);
    }

    #[test]
    fn test_category_includes_descendants() {
        let snapshot = mixed_catalog();
        let filters = FilterSpec {
            category: Some("women".to_string()),
            ..FilterSpec::default()
        };
        let page = all(filters).sorted_by(SortKey::NameAsc).run(&snapshot);
        assert_eq!(ids(&page), vec![2, 5, 1]);
    }

    #[test]
    fn test_unknown_slugs_match_nothing() {
        let snapshot = mixed_catalog();
        for filters in [
            FilterSpec {
                category: Some("menswear".to_string()),
                ..FilterSpec::default()
            },
            FilterSpec {
                collection: Some("resort".to_string()),
                ..FilterSpec::default()
            },
        ] {
            let page = all(filters).run(&snapshot);
            assert_eq!(page.total, 0);
            assert_eq!(page.total_pages, 0);
        }
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let snapshot = mixed_catalog();
        let filters = FilterSpec {
            category: Some("  ".to_string()),
            search: Some(String::new()),
            sizes: vec![" ".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(all(filters).run(&snapshot).total, 4);
    }

    #[test]
    fn test_sizes_and_colors_or_within_and_across() {
        let snapshot = mixed_catalog();
        let sizes = FilterSpec {
            sizes: vec!["s".to_string(), "L".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(ids(&all(sizes).run(&snapshot)), vec![1, 2]);

        let both = FilterSpec {
            sizes: vec!["S".to_string(), "L".to_string()],
            colors: vec!["BLACK".to_string()],
            ..FilterSpec::default()
        };
        assert_eq!(ids(&all(both).run(&snapshot)), vec![1]);
    }

    #[test]
    fn test_search_name_and_short_description() {
        let snapshot = mixed_catalog();
        let filters = FilterSpec {
            search: Some("SILK".to_string()),
            ..FilterSpec::default()
        };
        // The draft scarf also mentions silk but is unpublished.
        assert_eq!(ids(&all(filters).run(&snapshot)), vec![1, 2]);
    }

    #[test]
    fn test_price_bounds_use_effective_price() {
        let snapshot = mixed_catalog();
        let filters = FilterSpec {
            min_price: Some(Decimal::new(1200, 0)),
            max_price: Some(Decimal::new(1800, 0)),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&all(filters).run(&snapshot)), vec![1, 2]);
    }

    /// Soundness and completeness against a direct evaluation of each
    /// predicate.
    #[test]
    fn test_filters_sound_and_complete() {
        let snapshot = mixed_catalog();
        let cases = [
            FilterSpec {
                in_stock_only: true,
                ..FilterSpec::default()
            },
            FilterSpec {
                on_sale: true,
                ..FilterSpec::default()
            },
            FilterSpec {
                new_arrivals: true,
                in_stock_only: true,
                ..FilterSpec::default()
            },
            FilterSpec {
                collection: Some("evening".to_string()),
                ..FilterSpec::default()
            },
            FilterSpec {
                category: Some("accessories".to_string()),
                in_stock_only: true,
                ..FilterSpec::default()
            },
        ];
        let expected: [&dyn Fn(&Product) -> bool; 5] = [
            &|p: &Product| p.is_in_stock(),
            &|p: &Product| p.sale_price.is_some_and(|s| s < p.price),
            &|p: &Product| p.is_new && p.is_in_stock(),
            &|p: &Product| p.collection_ids.contains(&CollectionId::new(1)),
            &|p: &Product| p.category_ids.contains(&CategoryId::new(4)) && p.is_in_stock(),
        ];

        for (filters, predicate) in cases.into_iter().zip(expected) {
            let page = all(filters.clone()).run(&snapshot);
            let mut want: Vec<ProductId> = snapshot
                .products
                .iter()
                .filter(|p| p.published && predicate(p))
                .map(|p| p.id)
                .collect();
            want.sort();
            let mut got: Vec<ProductId> = page.items.iter().map(|p| p.id).collect();
            got.sort();
            assert_eq!(got, want, "{filters:?}");
        }
    }

    #[test]
    fn test_params_are_lenient() {
        let params = CatalogParams {
            min_price: Some("abc".to_string()),
            max_price: Some("250.50".to_string()),
            sizes: Some("S, M,,".to_string()),
            in_stock: Some("true".to_string()),
            on_sale: Some("nope".to_string()),
            sort: Some("bogus".to_string()),
            page: Some("-3".to_string()),
            limit: Some("500".to_string()),
            ..CatalogParams::default()
        };
        let query = params.into_query(DEFAULT_PAGE_SIZE);
        assert_eq!(query.filters.min_price, None);
        assert_eq!(query.filters.max_price, Some(Decimal::new(25050, 2)));
        assert_eq!(query.filters.sizes, vec!["S".to_string(), "M".to_string()]);
        assert!(query.filters.in_stock_only);
        assert!(!query.filters.on_sale);
        assert_eq!(query.sort, SortKey::Featured);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_params_default_limit() {
        let query = CatalogParams::default().into_query(DEFAULT_PAGE_SIZE);
        assert_eq!(query.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_related_products_share_primary_category() {
        let snapshot = mixed_catalog();
        let coat = &snapshot.products[1];
        let related: Vec<i32> = related_products(&snapshot.products, coat, 4)
            .iter()
            .map(|p| p.id.as_i32())
            .collect();
        // The draft scarf shares the category but is unpublished; the printed
        // scarf lists clothing second.
        assert_eq!(related, vec![5]);
    }

    #[tokio::test]
    async fn test_in_memory_store_snapshot_is_published_only() {
        let mut catalog = mixed_catalog();
        catalog.collections[0].published = false;
        let store = InMemoryProductStore::new(catalog);

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.products.len(), 4);
        assert!(snapshot.collections.is_empty());
        assert_eq!(snapshot.categories.len(), 4);
    }
}
