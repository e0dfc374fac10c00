//! Business logic services for admin.
//!
//! # Services
//!
//! - `upload` - Streaming image upload into object storage

pub mod upload;

pub use upload::{ObjectStorage, UploadFailure, UploadedImage, receive_upload};
