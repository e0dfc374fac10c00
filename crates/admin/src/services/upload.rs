//! Streaming image upload.
//!
//! The multipart body is read chunk by chunk through an
//! [`UploadGuard`]. Storage is only written once the whole file has been
//! received and accepted, so a rejected upload never leaves an object
//! behind.

use std::future::Future;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use maison_core::upload::{
    ImageKind, MAX_UPLOAD_BYTES, UploadError, UploadGuard, object_path, sanitize_folder,
};

use crate::supabase::StorageError;

/// Room for multipart boundaries and headers on top of the file itself.
pub const UPLOAD_BODY_OVERHEAD: usize = 64 * 1024;

/// Destination for uploaded objects.
pub trait ObjectStorage: Send + Sync {
    /// Write `body` at `path`.
    fn put(
        &self,
        path: &str,
        kind: ImageKind,
        body: Bytes,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Public URL an object is served from.
    fn public_url(&self, path: &str) -> String;
}

/// Response body of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub url: String,
    pub path: String,
}

/// Why an upload did not complete.
#[derive(Debug, Error)]
pub enum UploadFailure {
    /// The file was refused before anything was stored.
    #[error(transparent)]
    Rejected(#[from] UploadError),

    /// The request body is not valid `multipart/form-data`.
    #[error("malformed upload: {0}")]
    Malformed(String),

    /// Storage refused or failed the write.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<MultipartError> for UploadFailure {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::Rejected(UploadError::TooLarge {
                limit: MAX_UPLOAD_BYTES,
            });
        }
        Self::Malformed(err.body_text())
    }
}

/// Read the `file` and optional `folder` fields and store the file.
///
/// Other fields are skipped. Only the first `file` field is used.
///
/// # Errors
///
/// Returns `UploadFailure::Rejected` for a missing, empty, oversized or
/// non-image file, `Malformed` for a broken body and `Storage` when the
/// write fails.
#[tracing::instrument(skip_all)]
pub async fn receive_upload<S: ObjectStorage>(
    storage: &S,
    mut multipart: Multipart,
) -> Result<UploadedImage, UploadFailure> {
    let mut folder: Option<String> = None;
    let mut file: Option<(ImageKind, Vec<u8>)> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("folder") => folder = Some(field.text().await?),
            Some("file") if file.is_none() => {
                let mut guard = UploadGuard::new(field.content_type())?;
                let mut buffer = Vec::new();
                while let Some(chunk) = field.chunk().await? {
                    guard.accept(chunk.len())?;
                    buffer.extend_from_slice(&chunk);
                }
                file = Some((guard.finish()?, buffer));
            }
            _ => {}
        }
    }

    let (kind, buffer) = file.ok_or(UploadError::MissingFile)?;
    let folder = sanitize_folder(folder.as_deref());
    let path = object_path(
        &folder,
        kind,
        chrono::Utc::now().timestamp_millis(),
        Uuid::new_v4(),
    );

    let size = buffer.len();
    storage.put(&path, kind, Bytes::from(buffer)).await?;
    tracing::info!(path = %path, size, content_type = %kind, "image uploaded");

    Ok(UploadedImage {
        url: storage.public_url(&path),
        path,
    })
}
