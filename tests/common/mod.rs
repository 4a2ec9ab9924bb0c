#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
};
use bistro::auth::CookiePolicy;
use bistro::db::{Database, FoodFields};
use bistro::jwt::{DEFAULT_TOKEN_DURATION_SECS, JwtConfig};
use bistro::{ServerConfig, create_app};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret";
pub const TEST_ORIGIN: &str = "http://localhost:5173";
pub const BASE: &str = "/api/v1";

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub jwt: JwtConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }
}

pub async fn create_test_app() -> TestApp {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        base: BASE.to_string(),
        db: db.clone(),
        jwt_secret: TEST_SECRET.to_vec(),
        token_ttl: DEFAULT_TOKEN_DURATION_SECS,
        cookies: CookiePolicy::default(),
        allowed_origin: HeaderValue::from_static(TEST_ORIGIN),
    };
    TestApp {
        app: create_app(&config),
        db,
        jwt: JwtConfig::new(TEST_SECRET, DEFAULT_TOKEN_DURATION_SECS),
    }
}

impl TestApp {
    /// Cookie header value carrying a valid session for `email`.
    pub fn cookie_for(&self, email: &str) -> String {
        let issued = self.jwt.issue(email).expect("Failed to issue token");
        format!("token={}", issued.token)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder()
            .method("GET")
            .uri(format!("{}{}", BASE, path));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(format!("{}{}", BASE, path))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(
        &self,
        method: &str,
        path: &str,
        body: serde_json::Value,
    ) -> TestResponse {
        self.send(
            Request::builder()
                .method(method)
                .uri(format!("{}{}", BASE, path))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn send_raw(&self, method: &str, path: &str, body: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(method)
                .uri(format!("{}{}", BASE, path))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Insert a food directly into the store and return its id.
    pub async fn seed_food(&self, name: &str, price: f64, owner: &str, order_count: i64) -> String {
        self.db
            .foods()
            .insert(&food_fields(name, price, owner, Some(order_count)))
            .await
            .expect("Failed to seed food")
    }
}

pub fn food_fields(name: &str, price: f64, owner: &str, order_count: Option<i64>) -> FoodFields {
    FoodFields {
        name: name.to_string(),
        category: "Main".to_string(),
        origin: "Thailand".to_string(),
        price,
        quantity: 10,
        image: "https://img.example.com/food.png".to_string(),
        description: "Tasty".to_string(),
        user_email: owner.to_string(),
        order_count,
    }
}
