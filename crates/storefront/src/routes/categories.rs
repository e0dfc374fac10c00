//! Category navigation handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use maison_core::catalog::category::menu_tree;
use maison_core::catalog::{Category, CategoryNode};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct CategoryMenu {
    pub categories: Vec<CategoryNode>,
}

/// `GET /categories`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<CategoryList>> {
    let snapshot = state.catalog().snapshot().await?;
    Ok(Json(CategoryList {
        categories: snapshot.categories.clone(),
    }))
}

/// `GET /categories/menu`
#[instrument(skip(state))]
pub async fn menu(State(state): State<AppState>) -> Result<Json<CategoryMenu>> {
    let snapshot = state.catalog().snapshot().await?;
    Ok(Json(CategoryMenu {
        categories: menu_tree(&snapshot.categories),
    }))
}
