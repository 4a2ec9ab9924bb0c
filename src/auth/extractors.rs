//! Axum extractors for authentication.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::cookie::{TOKEN_COOKIE_NAME, get_cookie};
use super::errors::{ApiAuthError, AuthErrorKind};
use super::state::HasAuthBackend;
use super::types::AuthenticatedUser;
use crate::jwt::JwtError;

/// Verify the session cookie of a request.
fn authenticate_request<S>(parts: &Parts, state: &S) -> Result<AuthenticatedUser, ApiAuthError>
where
    S: HasAuthBackend,
{
    let token = get_cookie(&parts.headers, TOKEN_COOKIE_NAME)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiAuthError::new(AuthErrorKind::NotAuthenticated, None))?;

    let claims = state.jwt().verify(token).map_err(|e| {
        let kind = match e {
            JwtError::Expired => AuthErrorKind::Expired,
            _ => AuthErrorKind::InvalidToken,
        };
        ApiAuthError::new(kind, Some(state.cookies().clear_cookie()))
    })?;

    Ok(AuthenticatedUser { claims })
}

/// Extractor for API endpoints that require authentication.
/// Rejects with 401 when the `token` cookie is missing, expired or forged.
pub struct ApiAuth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for ApiAuth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate_request(parts, state).map(ApiAuth)
    }
}
