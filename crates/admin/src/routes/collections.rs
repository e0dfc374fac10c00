//! Collection management and membership.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use maison_core::catalog::{Collection, CollectionDraft};
use maison_core::{CollectionId, ProductId};

use super::json_body;
use crate::db::CollectionRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// `GET /collections` response.
#[derive(Debug, Serialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
}

/// `PUT /collections/{id}/products` body and response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub product_ids: Vec<ProductId>,
}

/// `GET /collections`
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<CollectionList>> {
    let collections = CollectionRepository::new(state.pool()).list().await?;
    Ok(Json(CollectionList { collections }))
}

/// `POST /collections`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: std::result::Result<Json<CollectionDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Collection>)> {
    let draft = json_body(payload)?;
    let slug = draft.validate()?;

    let collection = CollectionRepository::new(state.pool())
        .create(&draft, &slug)
        .await?;
    tracing::info!(collection_id = %collection.id, slug = %collection.slug, "collection created");
    Ok((StatusCode::CREATED, Json(collection)))
}

/// `PUT /collections/{id}`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<CollectionDraft>, JsonRejection>,
) -> Result<Json<Collection>> {
    let draft = json_body(payload)?;
    let slug = draft.validate()?;

    let collection = CollectionRepository::new(state.pool())
        .update(CollectionId::new(id), &draft, &slug)
        .await?;
    Ok(Json(collection))
}

/// `DELETE /collections/{id}`
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    CollectionRepository::new(state.pool())
        .delete(CollectionId::new(id))
        .await?;
    tracing::info!(collection_id = id, "collection deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /collections/{id}/products`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn set_products(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<Membership>, JsonRejection>,
) -> Result<Json<Membership>> {
    let membership = json_body(payload)?;
    let product_ids = CollectionRepository::new(state.pool())
        .replace_products(CollectionId::new(id), &membership.product_ids)
        .await?;
    tracing::info!(collection_id = id, count = product_ids.len(), "collection membership replaced");
    Ok(Json(Membership { product_ids }))
}
