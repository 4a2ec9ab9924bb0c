mod cart;
mod error;
mod extract;
mod foods;
mod results;
mod session;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::auth::CookiePolicy;
use crate::db::Database;
use crate::jwt::JwtConfig;

pub use error::ApiError;

/// Create the API router.
pub fn create_api_router(db: Database, jwt: Arc<JwtConfig>, cookies: CookiePolicy) -> Router {
    let session_state = session::SessionState {
        jwt: jwt.clone(),
        cookies,
    };

    let foods_state = foods::FoodsState {
        db: db.clone(),
        jwt: jwt.clone(),
        cookies,
    };

    let cart_state = cart::CartState {
        db: db.clone(),
        jwt,
        cookies,
    };

    let users_state = users::UsersState { db };

    Router::new()
        .merge(session::router(session_state))
        .merge(foods::router(foods_state))
        .merge(cart::router(cart_state))
        .merge(users::router(users_state))
}
