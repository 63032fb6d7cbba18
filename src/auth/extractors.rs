use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tracing::warn;

use crate::{
    auth::{jwt::JwtKeys, repo_types::User},
    config::AuthMode,
    error::AppError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

/// An admin established by the configured [`AuthMode`].
///
/// Legacy mode trusts the `email` query parameter and checks that account's
/// role. Token mode requires a bearer token whose subject is an admin.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = match state.config.auth_mode {
            AuthMode::Legacy => admin_from_query(parts, state).await?,
            AuthMode::Token => admin_from_bearer(parts, state).await?,
        };
        Ok(AdminUser(user))
    }
}

/// Gate for catalog writes (upload, clear, seed).
///
/// Open in legacy mode, where those routes were never guarded; carries the
/// verified admin in token mode.
pub struct CatalogWriter(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for CatalogWriter {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match state.config.auth_mode {
            AuthMode::Legacy => Ok(CatalogWriter(None)),
            AuthMode::Token => Ok(CatalogWriter(Some(admin_from_bearer(parts, state).await?))),
        }
    }
}

async fn admin_from_query(parts: &Parts, state: &AppState) -> Result<User, AppError> {
    let email = Query::<EmailQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(q)| q.email)
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Email required for admin access".into()))?;

    let user = state.users.find_by_email(&email).await?;
    require_admin(user)
}

async fn admin_from_bearer(parts: &Parts, state: &AppState) -> Result<User, AppError> {
    let auth_header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let keys = JwtKeys::from_ref(state);
    let claims = keys.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        AppError::Unauthorized("Invalid or expired token".into())
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    require_admin(Some(user))
}

fn require_admin(user: Option<User>) -> Result<User, AppError> {
    match user {
        Some(u) if u.is_admin() => Ok(u),
        Some(u) => {
            warn!(user_id = %u.id, "admin route denied");
            Err(AppError::Forbidden)
        }
        None => {
            warn!("admin route denied for unknown account");
            Err(AppError::Forbidden)
        }
    }
}
