//! Maison admin library.
//!
//! The back-office JSON API: catalog writes, order fulfilment, review
//! moderation, image upload and the deployment status report.
//!
//! # Security
//!
//! Every handler requires a bearer token whose profile carries the `admin`
//! role. The storage client holds the service-role key, so this binary must
//! never be exposed without that check.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod supabase;
