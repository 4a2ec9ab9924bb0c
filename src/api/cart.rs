//! Cart endpoints.
//!
//! Placing and removing entries is open; reading a cart requires the
//! owner's session.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::{ApiError, ResultExt, require_non_empty};
use super::extract::{ApiJson, ApiQuery};
use super::results::{DeleteResult, InsertResult};
use crate::auth::{ApiAuth, CookiePolicy};
use crate::db::{CartEntry, Database, NewCartEntry};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;

#[derive(Clone)]
pub struct CartState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookiePolicy,
}

impl_has_auth_backend!(CartState);

pub fn router(state: CartState) -> Router {
    Router::new()
        .route("/food-orders", post(place_order))
        .route("/cart", get(list_cart))
        .route("/user/delete-a-cart-food/{id}", delete(remove_entry))
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderRequest {
    email: String,
    food_id: String,
    quantity: i64,
    added_at: Option<String>,
}

#[derive(Deserialize)]
struct CartParams {
    email: Option<String>,
}

#[derive(Serialize)]
struct CartResponse {
    orders: Vec<CartEntry>,
}

async fn place_order(
    State(state): State<CartState>,
    ApiJson(payload): ApiJson<OrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_empty("email", &payload.email)?;
    require_non_empty("foodId", &payload.food_id)?;
    if payload.quantity < 1 {
        return Err(ApiError::bad_request("quantity must be at least 1"));
    }

    let id = state
        .db
        .cart()
        .insert(&NewCartEntry {
            email: payload.email,
            food_id: payload.food_id,
            quantity: payload.quantity,
            added_at: payload.added_at.filter(|t| !t.trim().is_empty()),
        })
        .await
        .db_err("Failed to add cart entry")?;

    Ok((StatusCode::CREATED, Json(InsertResult::new(id))))
}

async fn list_cart(
    State(state): State<CartState>,
    ApiAuth(user): ApiAuth,
    ApiQuery(params): ApiQuery<CartParams>,
) -> Result<impl IntoResponse, ApiError> {
    let email = params.email.unwrap_or_default();
    user.require_owner(&email)?;

    let orders = state
        .db
        .cart()
        .list_by_email(&email)
        .await
        .db_err("Failed to list cart")?;

    Ok(Json(CartResponse { orders }))
}

async fn remove_entry(
    State(state): State<CartState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .db
        .cart()
        .delete(&id)
        .await
        .db_err("Failed to delete cart entry")?;

    Ok(Json(DeleteResult::new(deleted)))
}
