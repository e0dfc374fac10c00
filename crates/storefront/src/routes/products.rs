//! Product listing and detail handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use maison_core::catalog::query::DEFAULT_PAGE_SIZE;
use maison_core::catalog::{
    CatalogParams, PriceDisplay, Product, ProductCard, ProductPage, Review, ReviewSummary,
    related_products,
};

use crate::db::ReviewRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Related products shown under a product.
const RELATED_LIMIT: usize = 4;

/// Product detail response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: PriceDisplay,
    pub related: Vec<ProductCard>,
    pub reviews: ReviewSummary,
}

/// Approved reviews with their summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReviews {
    pub summary: ReviewSummary,
    pub reviews: Vec<Review>,
}

/// `GET /products`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<ProductPage>> {
    let snapshot = state.catalog().snapshot().await?;
    Ok(Json(params.into_query(DEFAULT_PAGE_SIZE).run(&snapshot)))
}

/// `GET /products/{slug}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let snapshot = state.catalog().snapshot().await?;
    let product = find_published(&snapshot.products, &slug)?;

    let related = related_products(&snapshot.products, product, RELATED_LIMIT)
        .into_iter()
        .map(ProductCard::from)
        .collect();
    let reviews = ReviewRepository::new(state.pool())
        .list_approved(product.id)
        .await?;

    Ok(Json(ProductDetail {
        product: product.clone(),
        price_display: product.price_display(),
        related,
        reviews: ReviewSummary::from_reviews(&reviews),
    }))
}

/// `GET /products/{slug}/reviews`
#[instrument(skip(state))]
pub async fn reviews(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductReviews>> {
    let snapshot = state.catalog().snapshot().await?;
    let product = find_published(&snapshot.products, &slug)?;

    let reviews = ReviewRepository::new(state.pool())
        .list_approved(product.id)
        .await?;

    Ok(Json(ProductReviews {
        summary: ReviewSummary::from_reviews(&reviews),
        reviews,
    }))
}

fn find_published<'a>(products: &'a [Product], slug: &str) -> Result<&'a Product> {
    products
        .iter()
        .find(|p| p.published && p.slug == slug)
        .ok_or_else(|| AppError::NotFound("product".to_string()))
}
