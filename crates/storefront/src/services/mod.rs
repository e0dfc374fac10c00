//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Cached catalog snapshot feeding the listing resolver

pub mod catalog;

pub use catalog::CatalogService;
