//! Authentication error types.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

/// Why a request failed authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No session cookie was sent
    NotAuthenticated,
    /// The session token is past its expiry
    Expired,
    /// The session token is malformed or signed with another secret
    InvalidToken,
}

/// API authentication error (returns JSON, clears a rejected cookie).
#[derive(Debug)]
pub struct ApiAuthError {
    pub kind: AuthErrorKind,
    /// `Set-Cookie` value sent back when a token was present but rejected.
    pub(super) clear_cookie: Option<String>,
}

impl ApiAuthError {
    pub(super) fn new(kind: AuthErrorKind, clear_cookie: Option<String>) -> Self {
        Self { kind, clear_cookie }
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode};
        use serde::Serialize;

        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        tracing::debug!(kind = ?self.kind, "Rejected unauthenticated request");

        let mut response = (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "unauthorized access",
            }),
        )
            .into_response();

        if let Some(value) = self
            .clear_cookie
            .and_then(|c| HeaderValue::from_str(&c).ok())
        {
            response.headers_mut().append(header::SET_COOKIE, value);
        }

        response
    }
}
