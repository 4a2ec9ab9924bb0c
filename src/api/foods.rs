//! Food listing endpoints.
//!
//! Browsing is public. Reading a single food and listing the foods a user
//! added require a session; the latter is restricted to the owner.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ResultExt, require_non_empty, require_non_negative};
use super::extract::{ApiJson, ApiQuery};
use super::results::{DeleteResult, InsertResult, UpdateResult};
use crate::auth::{ApiAuth, CookiePolicy};
use crate::db::{Database, Food, FoodFields};
use crate::impl_has_auth_backend;
use crate::jwt::JwtConfig;
use crate::query::{CountStrategy, FoodQuery, ListParams, POPULAR_LIMIT, Pagination};

#[derive(Clone)]
pub struct FoodsState {
    pub db: Database,
    pub jwt: Arc<JwtConfig>,
    pub cookies: CookiePolicy,
}

impl_has_auth_backend!(FoodsState);

pub fn router(state: FoodsState) -> Router {
    Router::new()
        .route("/all-foods", get(list_foods))
        .route("/popular-foods", get(popular_foods))
        .route("/single-food/{id}", get(get_food))
        .route("/add-a-food", post(add_food))
        .route("/update-all-food/{id}", patch(update_stock))
        .route("/user/added-foods", get(list_added_foods))
        .route("/user/update-added-food/{id}", put(replace_food))
        .route("/user/delete-a-added-food/{id}", delete(delete_food))
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodRequest {
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    origin: String,
    price: f64,
    quantity: i64,
    #[serde(default)]
    image: String,
    #[serde(default)]
    description: String,
    user_email: String,
    order_count: Option<i64>,
}

impl FoodRequest {
    fn validate(self) -> Result<FoodFields, ApiError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("userEmail", &self.user_email)?;
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ApiError::bad_request("price cannot be negative"));
        }
        require_non_negative("quantity", self.quantity)?;
        if let Some(order_count) = self.order_count {
            require_non_negative("orderCount", order_count)?;
        }

        Ok(FoodFields {
            name: self.name.trim().to_string(),
            category: self.category,
            origin: self.origin,
            price: self.price,
            quantity: self.quantity,
            image: self.image,
            description: self.description,
            user_email: self.user_email,
            order_count: self.order_count,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockRequest {
    quantity: i64,
    order_count: i64,
}

#[derive(Deserialize)]
struct OwnerParams {
    email: Option<String>,
    page: Option<String>,
    size: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AllFoodsResponse {
    all_foods: Vec<Food>,
    count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddedFoodsResponse {
    food_user_add: Vec<Food>,
    count: i64,
}

// --- Handlers ---

async fn list_foods(
    State(state): State<FoodsState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = FoodQuery::from(&params);

    let all_foods = state
        .db
        .foods()
        .list(&query)
        .await
        .db_err("Failed to list foods")?;

    // Filtered searches report the page length, not the number of matches
    let count = match query.count_strategy() {
        CountStrategy::ReturnedLength => all_foods.len() as i64,
        CountStrategy::Collection => state
            .db
            .foods()
            .count()
            .await
            .db_err("Failed to count foods")?,
    };

    Ok(Json(AllFoodsResponse { all_foods, count }))
}

async fn popular_foods(State(state): State<FoodsState>) -> Result<impl IntoResponse, ApiError> {
    let foods = state
        .db
        .foods()
        .most_ordered(POPULAR_LIMIT)
        .await
        .db_err("Failed to list popular foods")?;

    Ok(Json(foods))
}

async fn get_food(
    State(state): State<FoodsState>,
    ApiAuth(_user): ApiAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let food = state
        .db
        .foods()
        .get(&id)
        .await
        .db_err("Failed to get food")?;

    Ok(Json(food))
}

async fn list_added_foods(
    State(state): State<FoodsState>,
    ApiAuth(user): ApiAuth,
    ApiQuery(params): ApiQuery<OwnerParams>,
) -> Result<impl IntoResponse, ApiError> {
    let email = params.email.unwrap_or_default();
    user.require_owner(&email)?;

    let pagination = Pagination::parse(params.page.as_deref(), params.size.as_deref());

    let food_user_add = state
        .db
        .foods()
        .list_by_owner(&email, pagination)
        .await
        .db_err("Failed to list added foods")?;

    let count = state
        .db
        .foods()
        .count_by_owner(&email)
        .await
        .db_err("Failed to count added foods")?;

    Ok(Json(AddedFoodsResponse {
        food_user_add,
        count,
    }))
}

async fn add_food(
    State(state): State<FoodsState>,
    ApiJson(payload): ApiJson<FoodRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = payload.validate()?;

    let id = state
        .db
        .foods()
        .insert(&fields)
        .await
        .db_err("Failed to add food")?;

    info!(food_id = %id, owner = %fields.user_email, "Food added");

    Ok((StatusCode::CREATED, Json(InsertResult::new(id))))
}

async fn update_stock(
    State(state): State<FoodsState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<StockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_negative("quantity", payload.quantity)?;
    require_non_negative("orderCount", payload.order_count)?;

    let outcome = state
        .db
        .foods()
        .update_stock(&id, payload.quantity, payload.order_count)
        .await
        .db_err("Failed to update food stock")?;

    Ok(Json(UpdateResult::from(outcome)))
}

async fn replace_food(
    State(state): State<FoodsState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<FoodRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_empty("id", &id)?;
    let fields = payload.validate()?;

    let outcome = state
        .db
        .foods()
        .upsert(&id, &fields)
        .await
        .db_err("Failed to update food")?;

    if outcome.upserted_id.is_some() {
        info!(food_id = %id, "Food created by upsert");
    }

    Ok(Json(UpdateResult::from(outcome)))
}

async fn delete_food(
    State(state): State<FoodsState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (deleted, cart_entries) = state
        .db
        .foods()
        .delete_cascade(&id)
        .await
        .db_err("Failed to delete food")?;

    info!(food_id = %id, deleted, cart_entries, "Food deleted");

    Ok(Json(DeleteResult {
        cart_entries_deleted: Some(cart_entries),
        ..DeleteResult::new(deleted)
    }))
}
