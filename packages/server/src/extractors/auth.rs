use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. The identity is
/// decoded fresh on every request; nothing is cached between requests.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

/// Pull the raw token out of a `Bearer` authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::TokenMissing)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Token rejected: {e}");
            AppError::TokenInvalid
        })?;

        Ok(AuthUser {
            user_id: claims.uid,
            email: claims.sub,
        })
    }
}
