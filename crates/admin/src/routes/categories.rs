//! Category tree management.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use maison_core::CategoryId;
use maison_core::catalog::{Category, CategoryDraft};

use super::json_body;
use crate::db::CategoryRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// `GET /categories` response.
#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

/// `GET /categories`
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<CategoryList>> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(CategoryList { categories }))
}

/// `POST /categories`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    payload: std::result::Result<Json<CategoryDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>)> {
    let draft = json_body(payload)?;
    let slug = draft.validate(None)?;

    let category = CategoryRepository::new(state.pool())
        .create(&draft, &slug)
        .await?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /categories/{id}`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<CategoryDraft>, JsonRejection>,
) -> Result<Json<Category>> {
    let id = CategoryId::new(id);
    let draft = json_body(payload)?;
    let slug = draft.validate(Some(id))?;

    let category = CategoryRepository::new(state.pool())
        .update(id, &draft, &slug)
        .await?;
    tracing::info!(category_id = %id, "category updated");
    Ok(Json(category))
}

/// `DELETE /categories/{id}`
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;
    tracing::info!(category_id = id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}
