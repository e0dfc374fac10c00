//! HTTP middleware and extractors for the admin API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (stricter for admin)
//!
//! Authorization is per handler through the [`RequireAdmin`] extractor.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{AdminIdentity, RequireAdmin};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
