//! Collection handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use maison_core::catalog::collection::find_by_slug;
use maison_core::catalog::query::DEFAULT_PAGE_SIZE;
use maison_core::catalog::{CatalogParams, Collection, ProductPage};

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
}

/// A collection with one page of its products.
#[derive(Debug, Serialize)]
pub struct CollectionDetail {
    pub collection: Collection,
    pub products: ProductPage,
}

/// `GET /collections`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<CollectionList>> {
    let snapshot = state.catalog().snapshot().await?;
    Ok(Json(CollectionList {
        collections: snapshot.collections.clone(),
    }))
}

/// `GET /collections/{slug}`
///
/// Accepts the product listing query string; the collection filter is
/// always the path slug. Without a `sort` parameter the collection's curated
/// order comes first.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CollectionDetail>> {
    let snapshot = state.catalog().snapshot().await?;
    let collection = find_by_slug(&snapshot.collections, &slug)
        .filter(|c| c.published)
        .ok_or_else(|| AppError::NotFound("collection".to_string()))?
        .clone();

    let curated = params.sort.as_deref().is_none_or(|s| s.trim().is_empty());
    let mut query = params.into_query(DEFAULT_PAGE_SIZE);
    query.filters.collection = Some(slug);

    let products = if curated {
        query.run_curated(&snapshot, &collection.product_ids)
    } else {
        query.run(&snapshot)
    };
    Ok(Json(CollectionDetail {
        products,
        collection,
    }))
}
