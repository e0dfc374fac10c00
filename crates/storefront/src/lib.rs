//! Maison storefront library.
//!
//! The public JSON API: catalog browsing, session-backed cart and wishlist,
//! and the signed-in customer's order history. The binary in `main.rs`
//! wires these modules into a server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod supabase;
