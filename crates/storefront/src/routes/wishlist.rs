//! Wishlist handlers.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use maison_core::ProductId;
use maison_core::catalog::ProductCard;

use crate::error::{AppError, Result};
use crate::middleware::Visitor;
use crate::state::AppState;

/// Wishlist response.
///
/// Products that are no longer published stay in the stored wishlist but
/// are not listed.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<WishlistEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub added_at: DateTime<Utc>,
    pub product: ProductCard,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWishlist {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistToggled {
    pub product_id: ProductId,
    pub in_wishlist: bool,
    pub count: usize,
}

async fn view(state: &AppState, visitor: &Visitor) -> Result<WishlistView> {
    let snapshot = state.catalog().snapshot().await?;
    let wishlist = &visitor.state.wishlist;
    let items = wishlist
        .items()
        .iter()
        .filter_map(|item| {
            snapshot
                .products
                .iter()
                .find(|p| p.published && p.id == item.product_id)
                .map(|p| WishlistEntry {
                    added_at: item.added_at,
                    product: ProductCard::from(p),
                })
        })
        .collect();
    Ok(WishlistView {
        items,
        count: wishlist.count(),
    })
}

/// `GET /wishlist`
#[instrument(skip(state, visitor))]
pub async fn show(State(state): State<AppState>, visitor: Visitor) -> Result<Json<WishlistView>> {
    Ok(Json(view(&state, &visitor).await?))
}

/// `POST /wishlist/toggle`
#[instrument(skip(state, visitor))]
pub async fn toggle(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Json(input): Json<ToggleWishlist>,
) -> Result<Json<WishlistToggled>> {
    let wishlist = &mut visitor.state.wishlist;
    if !wishlist.contains(input.product_id) {
        let snapshot = state.catalog().snapshot().await?;
        if !snapshot
            .products
            .iter()
            .any(|p| p.published && p.id == input.product_id)
        {
            return Err(AppError::NotFound("product".to_string()));
        }
    }

    let in_wishlist = wishlist.toggle(input.product_id, Utc::now());
    let count = wishlist.count();
    visitor.save_wishlist().await?;

    Ok(Json(WishlistToggled {
        product_id: input.product_id,
        in_wishlist,
        count,
    }))
}

/// `DELETE /wishlist`
#[instrument(skip(state, visitor))]
pub async fn clear(State(state): State<AppState>, mut visitor: Visitor) -> Result<Json<WishlistView>> {
    visitor.state.wishlist.clear();
    visitor.save_wishlist().await?;
    Ok(Json(view(&state, &visitor).await?))
}
