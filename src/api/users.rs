use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{ApiError, ResultExt, require_non_empty};
use super::extract::ApiJson;
use super::results::InsertResult;
use crate::db::{Database, NewUser, User};

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
}

pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/add-a-user", post(add_user))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddUserRequest {
    email: String,
    name: Option<String>,
    photo_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExistingUserResponse {
    message: &'static str,
    inserted_id: Option<String>,
    user: User,
}

async fn add_user(
    State(state): State<UsersState>,
    ApiJson(payload): ApiJson<AddUserRequest>,
) -> Result<Response, ApiError> {
    let email = payload.email.trim();
    require_non_empty("email", email)?;

    if !email.contains('@') {
        return Err(ApiError::bad_request("email is not valid"));
    }

    // Lookup before insert; the store has no unique constraint on email
    let existing = state
        .db
        .users()
        .get_by_email(email)
        .await
        .db_err("Failed to look up user")?;

    if let Some(user) = existing {
        return Ok(Json(ExistingUserResponse {
            message: "user already exists",
            inserted_id: None,
            user,
        })
        .into_response());
    }

    let id = state
        .db
        .users()
        .insert(&NewUser {
            email: email.to_string(),
            name: payload.name,
            photo_url: payload.photo_url,
        })
        .await
        .db_err("Failed to create user")?;

    info!(user_id = %id, "User registered");

    Ok((StatusCode::CREATED, Json(InsertResult::new(id))).into_response())
}
