mod common;

use axum::http::StatusCode;
use common::create_test_app;
use serde_json::json;

#[tokio::test]
async fn test_add_user() {
    let t = create_test_app().await;

    let response = t
        .send_json(
            "POST",
            "/add-a-user",
            json!({
                "email": "alice@example.com",
                "name": "Alice",
                "photoUrl": "https://img.example.com/alice.png"
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let json = response.json();
    assert_eq!(json["acknowledged"], true);
    assert!(json["insertedId"].as_str().is_some());

    let user = t
        .db
        .users()
        .get_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.name.as_deref(), Some("Alice"));
}

#[tokio::test]
async fn test_add_user_twice_returns_existing() {
    let t = create_test_app().await;
    let body = json!({"email": "alice@example.com", "name": "Alice"});

    let first = t.send_json("POST", "/add-a-user", body.clone()).await.json();
    let first_id = first["insertedId"].as_str().unwrap().to_string();

    let response = t
        .send_json(
            "POST",
            "/add-a-user",
            json!({"email": "alice@example.com", "name": "Someone Else"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let json = response.json();
    assert_eq!(json["message"], "user already exists");
    assert_eq!(json["insertedId"], serde_json::Value::Null);
    assert_eq!(json["user"]["_id"], first_id.as_str());
    assert_eq!(json["user"]["name"], "Alice");
}

#[tokio::test]
async fn test_add_user_invalid_email() {
    let t = create_test_app().await;

    for email in ["", "   ", "not-an-email"] {
        let response = t
            .send_json("POST", "/add-a-user", json!({"email": email}))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "email {:?}", email);
    }
}

#[tokio::test]
async fn test_add_user_malformed_body() {
    let t = create_test_app().await;

    for body in [r#"{"name": "Alice"}"#, r#"{"email": 42}"#, "email=alice"] {
        let response = t.send_raw("POST", "/add-a-user", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body {}", body);
        assert!(response.json()["error"].as_str().is_some());
    }
}
