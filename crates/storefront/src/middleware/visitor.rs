//! Session-backed visitor state.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use tower_sessions::{Session, session};

use maison_core::state::{CartState, ClientState, WishlistState, keys};

use crate::error::AppError;

/// Read a session entry, treating a missing or undecodable value as empty.
async fn load_or_default<T>(session: &Session, key: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match session.get::<T>(key).await {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(session::Error::SerdeJson(err)) => {
            tracing::warn!(key, error = %err, "Discarding undecodable session entry");
            Ok(T::default())
        }
        Err(err) => Err(AppError::Session(err)),
    }
}

/// The visitor's cart, wishlist and UI state, loaded from the session.
///
/// Handlers mutate [`Visitor::state`] and call the matching `save_*` method
/// to persist the change. A missing or undecodable entry starts empty. A
/// failing session store rejects the request.
pub struct Visitor {
    session: Session,
    pub state: ClientState,
}

impl Visitor {
    /// Persist the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn save_cart(&self) -> Result<(), AppError> {
        self.session.insert(keys::CART, &self.state.cart).await?;
        Ok(())
    }

    /// Persist the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn save_wishlist(&self) -> Result<(), AppError> {
        self.session
            .insert(keys::WISHLIST, &self.state.wishlist)
            .await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let cart = load_or_default::<CartState>(&session, keys::CART).await?;
        let wishlist = load_or_default::<WishlistState>(&session, keys::WISHLIST).await?;

        Ok(Self {
            session,
            state: ClientState::new(cart, wishlist),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::{Router, routing::get};
    use serde_json::json;
    use tower::ServiceExt;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};
    use tower_sessions::{SessionStore, session_store};

    use super::*;
    use crate::middleware::session::{SESSION_COOKIE_NAME, configure};

    /// Store that either fails every call or serves a record with a bad cart.
    #[derive(Debug, Clone, Copy)]
    enum StubStore {
        Down,
        Garbled,
    }

    #[async_trait]
    impl SessionStore for StubStore {
        async fn save(&self, _record: &Record) -> session_store::Result<()> {
            match self {
                Self::Down => Err(session_store::Error::Backend("store down".to_string())),
                Self::Garbled => Ok(()),
            }
        }

        async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
            match self {
                Self::Down => Err(session_store::Error::Backend("store down".to_string())),
                Self::Garbled => Ok(Some(Record {
                    id: *id,
                    data: HashMap::from([(keys::CART.to_string(), json!("not a cart"))]),
                    expiry_date: OffsetDateTime::now_utc() + Duration::days(1),
                })),
            }
        }

        async fn delete(&self, _id: &Id) -> session_store::Result<()> {
            Ok(())
        }
    }

    async fn cart_count(visitor: Visitor) -> String {
        visitor.state.cart.count().to_string()
    }

    async fn get_count(store: StubStore) -> (StatusCode, String) {
        let app = Router::new()
            .route("/count", get(cart_count))
            .layer(configure(store, false));
        let request = Request::get("/count")
            .header(header::COOKIE, format!("{SESSION_COOKIE_NAME}={}", Id::default()))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_store_failure_rejects_request() {
        let (status, body) = get_count(StubStore::Down).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Internal server error"));
    }

    #[tokio::test]
    async fn test_undecodable_cart_starts_empty() {
        let (status, body) = get_count(StubStore::Garbled).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "0");
    }
}
