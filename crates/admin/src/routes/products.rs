//! Product table and product writes.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use maison_core::ProductId;
use maison_core::catalog::{CatalogParams, Product, ProductDraft, ProductPage};

use super::{ADMIN_PAGE_SIZE, json_body};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Listing query: the storefront contract plus a publication filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminProductParams {
    #[serde(flatten)]
    pub catalog: CatalogParams,
    /// `published` or `draft`; anything else shows both.
    pub status: Option<String>,
}

/// Publication state filter for the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Publication {
    Any,
    Published,
    Draft,
}

impl Publication {
    fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("published") => Self::Published,
            Some(v) if v.eq_ignore_ascii_case("draft") => Self::Draft,
            _ => Self::Any,
        }
    }

    const fn admits(self, product: &Product) -> bool {
        match self {
            Self::Any => true,
            Self::Published => product.published,
            Self::Draft => !product.published,
        }
    }
}

/// `GET /products`
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AdminProductParams>,
) -> Result<Json<ProductPage>> {
    let mut snapshot = ProductRepository::new(state.pool()).snapshot().await?;
    let publication = Publication::from_param(params.status.as_deref());
    snapshot.products.retain(|p| publication.admits(p));

    let page = params
        .catalog
        .into_query(ADMIN_PAGE_SIZE)
        .run_unrestricted(&snapshot);
    Ok(Json(page))
}

/// `GET /products/{id}`
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("product".to_string()))
}

/// `POST /products`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = json_body(payload)?;
    let slug = draft.validate()?;

    let product = ProductRepository::new(state.pool())
        .create(&draft, &slug)
        .await?;
    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/{id}`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Json<Product>> {
    let draft = json_body(payload)?;
    let slug = draft.validate()?;

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &draft, &slug)
        .await?;
    tracing::info!(product_id = %product.id, "product updated");
    Ok(Json(product))
}

/// `DELETE /products/{id}`
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    tracing::info!(product_id = id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_param() {
        assert_eq!(Publication::from_param(Some("Draft")), Publication::Draft);
        assert_eq!(Publication::from_param(Some("published")), Publication::Published);
        assert_eq!(Publication::from_param(Some("archived")), Publication::Any);
        assert_eq!(Publication::from_param(None), Publication::Any);
    }

    #[test]
    fn test_params_flatten_catalog_contract() {
        let params: AdminProductParams =
            parse_params("status=draft&sort=price-desc&inStock=true&limit=50");
        assert_eq!(params.status.as_deref(), Some("draft"));
        let query = params.catalog.into_query(ADMIN_PAGE_SIZE);
        assert!(query.filters.in_stock_only);
        assert_eq!(query.limit, 50);
    }

    fn parse_params(query: &str) -> AdminProductParams {
        let uri: axum::http::Uri = format!("/products?{query}").parse().unwrap();
        Query::<AdminProductParams>::try_from_uri(&uri).unwrap().0
    }
}
