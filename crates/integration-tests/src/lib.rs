//! Integration tests for Maison.
//!
//! These run against live servers and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Database, migrations and a seeded catalog
//! cargo run -p maison-cli -- migrate
//! cargo run -p maison-cli -- seed catalog.yaml
//!
//! # Both servers
//! cargo run -p maison-storefront &
//! cargo run -p maison-admin &
//!
//! # Tests
//! MAISON_ADMIN_TOKEN=<access token of an admin> \
//!     cargo test -p maison-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - default `http://localhost:3000`
//! - `ADMIN_BASE_URL` - default `http://localhost:3001`
//! - `MAISON_ADMIN_TOKEN` - bearer token for admin routes

use reqwest::Client;

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Admin bearer token, if configured.
#[must_use]
pub fn admin_token() -> Option<String> {
    std::env::var("MAISON_ADMIN_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty())
}

/// Client that keeps the session cookie between requests, like a browser.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
