//! Image upload endpoint.

use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::{UploadedImage, receive_upload};
use crate::state::AppState;

/// `POST /upload`
///
/// Multipart form with a `file` field and an optional `folder` field.
/// The admin is authorized before any of the body is read.
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.user_id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Json<UploadedImage>> {
    let image = receive_upload(state.storage(), multipart).await?;
    Ok(Json(image))
}
