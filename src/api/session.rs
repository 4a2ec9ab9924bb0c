//! Session cookie endpoints.
//!
//! - POST `/jwt` - Issue a session token for an identity and set it as a cookie
//! - POST `/logout` - Clear the session cookie

use axum::{
    Json, Router,
    extract::State,
    http::header::SET_COOKIE,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use super::error::{ApiError, require_non_empty};
use super::extract::ApiJson;
use crate::auth::CookiePolicy;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct SessionState {
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookiePolicy,
}

pub fn router(state: SessionState) -> Router {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", post(logout))
        .with_state(state)
}

#[derive(Deserialize)]
struct IssueTokenRequest {
    email: String,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

async fn issue_token(
    State(state): State<SessionState>,
    ApiJson(payload): ApiJson<IssueTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_empty("email", &payload.email)?;

    let issued = state.jwt.issue(&payload.email).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::Internal("Failed to issue token".into())
    })?;

    info!(email = %payload.email, "Issued session token");

    let cookie = state.cookies.session_cookie(&issued.token, issued.duration);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(SuccessResponse { success: true }),
    ))
}

async fn logout(State(state): State<SessionState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, state.cookies.clear_cookie())],
        Json(SuccessResponse { success: true }),
    )
}
