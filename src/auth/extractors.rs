//! Request guards for protected routes.
//!
//! `CurrentUser` resolves the bearer token to an active account; `AdminUser`
//! additionally requires the admin flag. A rejection short-circuits the
//! request before the handler body runs.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::{error::AppError, state::AppState, users::repo_types::PublicUser};

const NO_TOKEN: &str = "No token, authorization denied";
const BAD_TOKEN: &str = "Token is not valid";

/// Authenticated account, password hash stripped.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

/// Authenticated account holding the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub PublicUser);

/// Token from `Authorization: Bearer <token>`; anything else counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<PublicUser, AppError> {
    let token = bearer_token(headers).ok_or_else(|| AppError::Unauthorized(NO_TOKEN.into()))?;

    let user_id = state.jwt.verify(token).map_err(|e| {
        debug!(error = %e, "token rejected");
        AppError::Unauthorized(BAD_TOKEN.into())
    })?;

    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token references missing user");
        AppError::Unauthorized(BAD_TOKEN.into())
    })?;

    if !user.is_active {
        warn!(%user_id, "deactivated account presented a token");
        return Err(AppError::BadRequest("Account is deactivated".into()));
    }

    Ok(user.into())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(state, &parts.headers).await.map(CurrentUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = authenticate(state, &parts.headers).await?;
        if !user.is_admin {
            warn!(user_id = %user.id, "admin route denied");
            return Err(AppError::Forbidden(
                "Access denied. Admin privileges required.".into(),
            ));
        }
        Ok(AdminUser(user))
    }
}
