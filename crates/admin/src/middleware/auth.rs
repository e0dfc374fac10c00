//! Admin authorization extractor.
//!
//! Callers send the access token issued by the hosted auth service as
//! `Authorization: Bearer <token>`. The token is resolved to a user and the
//! user's profile must carry the `admin` role.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use maison_core::UserId;

use crate::db::ProfileRepository;
use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;
use crate::supabase::bearer_token;

/// The admin making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub user_id: UserId,
    pub email: Option<String>,
}

/// Extractor that requires an admin caller.
///
/// Rejects with `401` when the token is missing or invalid and `403` when
/// the user exists but is not an admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> String {
///     format!("Hello, {}!", admin.user_id)
/// }
/// ```
pub struct RequireAdmin(pub AdminIdentity);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("sign in required".to_string()))?;
        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_string()))?;

        let user = state.auth().get_user(token).await?;
        set_sentry_user(&user.id, user.email.as_deref());

        let profile = ProfileRepository::new(state.pool()).get(user.id).await?;
        if !profile.is_some_and(|p| p.is_admin()) {
            return Err(AppError::Forbidden("admin role required".to_string()));
        }

        tracing::Span::current().record("admin_id", tracing::field::display(user.id));
        Ok(Self(AdminIdentity {
            user_id: user.id,
            email: user.email,
        }))
    }
}
