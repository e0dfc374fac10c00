//! Authentication extractors.
//!
//! Signed-in customers send the access token issued by the hosted auth
//! service as `Authorization: Bearer <token>`. Anonymous visitors are
//! identified only by their session cookie.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::state::AppState;
use crate::supabase::{AuthUser, bearer_token};

/// Extractor that requires a valid access token.
///
/// Rejects with `401` and a JSON error body when the header is missing or
/// the token is rejected by the auth service.
pub struct RequireUser(pub AuthUser);

/// Extractor that resolves a user when a bearer token is present.
///
/// A missing header yields `None`; a present but invalid token is still
/// rejected.
pub struct OptionalUser(pub Option<AuthUser>);

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_string()))?;

    let user = state.auth().get_user(token).await?;
    set_sentry_user(&user.id, user.email.as_deref());
    Ok(Some(user))
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("sign in required".to_string()))
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state).await.map(Self)
    }
}
