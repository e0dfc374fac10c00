//! Review moderation queue.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use maison_core::catalog::{Review, ReviewModeration};
use maison_core::{ProductId, ReviewId};

use super::json_body;
use crate::db::{ReviewFilter, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Moderation queue query string. Values that do not parse are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewParams {
    pub approved: Option<String>,
    pub product_id: Option<String>,
}

impl ReviewParams {
    fn into_filter(self) -> ReviewFilter {
        ReviewFilter {
            approved: self.approved.and_then(|v| v.trim().parse().ok()),
            product_id: self
                .product_id
                .and_then(|v| v.trim().parse().ok())
                .map(ProductId::new),
        }
    }
}

/// `GET /reviews` response.
#[derive(Debug, Serialize)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
}

/// `GET /reviews`
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ReviewParams>,
) -> Result<Json<ReviewList>> {
    let reviews = ReviewRepository::new(state.pool())
        .list(params.into_filter())
        .await?;
    Ok(Json(ReviewList { reviews }))
}

/// `PATCH /reviews/{id}`
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.user_id))]
pub async fn moderate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<ReviewModeration>, JsonRejection>,
) -> Result<Json<Review>> {
    let change = json_body(payload)?;
    if change.is_empty() {
        return Err(AppError::BadRequest("nothing to update".to_string()));
    }

    let review = ReviewRepository::new(state.pool())
        .moderate(ReviewId::new(id), change)
        .await?;
    tracing::info!(review_id = id, approved = review.approved, featured = review.featured, "review moderated");
    Ok(Json(review))
}

/// `DELETE /reviews/{id}`
#[instrument(skip(state, admin), fields(admin_id = %admin.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    ReviewRepository::new(state.pool())
        .delete(ReviewId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_parse_leniently() {
        let filter = ReviewParams {
            approved: Some("false".to_string()),
            product_id: Some("abc".to_string()),
        }
        .into_filter();
        assert_eq!(filter.approved, Some(false));
        assert_eq!(filter.product_id, None);
    }
}
