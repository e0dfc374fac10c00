//! Maison Core - Shared catalog types and pure storefront logic.
//!
//! This crate is used by every Maison component:
//! - `storefront` - Public catalog, cart, wishlist and account API
//! - `admin` - Back-office API for catalog, orders, reviews and uploads
//! - `cli` - Migrations, catalog seeding and admin role management
//!
//! # Architecture
//!
//! No I/O lives here. The catalog resolver is a pure function over a
//! [`catalog::CatalogSnapshot`]; row projections, state containers and
//! upload checks are plain value transformations. The optional `postgres`
//! feature adds `sqlx` derives to IDs and row types.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, slugs and status enums
//! - [`catalog`] - Products, categories, collections, orders, reviews and
//!   the listing resolver
//! - [`projection`] - Database row shapes and their view models
//! - [`state`] - Cart, wishlist and UI visibility containers
//! - [`upload`] - Image upload validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod account;
pub mod catalog;
pub mod projection;
pub mod state;
pub mod types;
pub mod upload;

pub use account::Profile;
pub use types::*;
