//! Image upload validation and object naming.
//!
//! The admin upload handler feeds the multipart body through an
//! [`UploadGuard`] chunk by chunk, so an oversized or mistyped file is
//! rejected before anything reaches storage.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Folder used when the form does not name one.
pub const DEFAULT_UPLOAD_FOLDER: &str = "products";

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Avif,
}

impl ImageKind {
    pub const ALL: [Self; 4] = [Self::Jpeg, Self::Png, Self::Webp, Self::Avif];

    /// Match a `Content-Type` value, ignoring case and parameters.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.content_type().eq_ignore_ascii_case(essence))
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Avif => "image/avif",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Avif => "avif",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

/// Reasons an upload is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("no file provided")]
    MissingFile,
    #[error("invalid file type {0:?}: allowed types are JPEG, PNG, WebP and AVIF")]
    UnsupportedType(String),
    #[error("file too large: maximum size is {} MB", .limit / (1024 * 1024))]
    TooLarge { limit: usize },
    #[error("file is empty")]
    Empty,
}

/// Tracks one file as it streams in.
#[derive(Debug)]
pub struct UploadGuard {
    kind: ImageKind,
    limit: usize,
    received: usize,
}

impl UploadGuard {
    /// Start accepting a file declared with `content_type`.
    ///
    /// # Errors
    ///
    /// Returns `MissingFile` without a content type and `UnsupportedType`
    /// for anything but JPEG, PNG, WebP or AVIF.
    pub fn new(content_type: Option<&str>) -> Result<Self, UploadError> {
        Self::with_limit(content_type, MAX_UPLOAD_BYTES)
    }

    /// Like [`UploadGuard::new`] with a custom size limit.
    ///
    /// # Errors
    ///
    /// See [`UploadGuard::new`].
    pub fn with_limit(content_type: Option<&str>, limit: usize) -> Result<Self, UploadError> {
        let content_type = content_type.ok_or(UploadError::MissingFile)?;
        let kind = ImageKind::from_content_type(content_type)
            .ok_or_else(|| UploadError::UnsupportedType(content_type.to_owned()))?;
        Ok(Self {
            kind,
            limit,
            received: 0,
        })
    }

    /// Account for the next chunk.
    ///
    /// # Errors
    ///
    /// Returns `TooLarge` as soon as the running total passes the limit.
    pub fn accept(&mut self, chunk_len: usize) -> Result<(), UploadError> {
        self.received = self.received.saturating_add(chunk_len);
        if self.received > self.limit {
            return Err(UploadError::TooLarge { limit: self.limit });
        }
        Ok(())
    }

    /// Close the file once the body is fully read.
    ///
    /// # Errors
    ///
    /// Returns `Empty` when no bytes arrived.
    pub const fn finish(&self) -> Result<ImageKind, UploadError> {
        if self.received == 0 {
            return Err(UploadError::Empty);
        }
        Ok(self.kind)
    }

    #[must_use]
    pub const fn kind(&self) -> ImageKind {
        self.kind
    }

    #[must_use]
    pub const fn received(&self) -> usize {
        self.received
    }
}

/// Normalize a requested folder to `[a-z0-9-_/]`.
///
/// Other characters are dropped, empty segments collapse, and an empty
/// result becomes [`DEFAULT_UPLOAD_FOLDER`].
#[must_use]
pub fn sanitize_folder(folder: Option<&str>) -> String {
    let cleaned: String = folder
        .unwrap_or_default()
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '/'))
        .collect();
    let segments: Vec<&str> = cleaned.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        DEFAULT_UPLOAD_FOLDER.to_owned()
    } else {
        segments.join("/")
    }
}

/// Object key for a new upload: `{folder}/{unix_millis}-{id8}.{ext}`.
#[must_use]
pub fn object_path(folder: &str, kind: ImageKind, unix_millis: i64, id: Uuid) -> String {
    let simple = id.simple().to_string();
    let short = simple.get(..8).unwrap_or(&simple);
    format!("{folder}/{unix_millis}-{short}.{}", kind.extension())
}
