#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use std::sync::Arc;
use tokengate::{
    ServerConfig, create_app, create_app_with_codec,
    db::Database,
    jwt::{JwtConfig, TokenCodec, TokenLifetimes},
    password,
};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-for-testing";

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "test123";

async fn test_config() -> ServerConfig {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    ServerConfig {
        db,
        jwt_secret: TEST_SECRET.to_vec(),
        lifetimes: TokenLifetimes::default(),
        bcrypt_cost: password::MIN_COST,
    }
}

/// Create a test app and return (app, db, jwt_config).
pub async fn create_test_app() -> (Router, Database, JwtConfig) {
    let config = test_config().await;
    (
        create_app(&config),
        config.db.clone(),
        JwtConfig::new(TEST_SECRET),
    )
}

/// Create a test app whose handlers use the given token codec.
pub async fn create_test_app_with_codec(tokens: Arc<dyn TokenCodec>) -> (Router, Database) {
    let config = test_config().await;
    (create_app_with_codec(&config, tokens), config.db.clone())
}

/// Insert a user directly into the database and return its UUID.
pub async fn insert_user(db: &Database, email: &str) -> String {
    let uuid = uuid::Uuid::new_v4().to_string();
    db.users()
        .create(&uuid, email, "not-a-real-hash")
        .await
        .expect("Failed to create user");
    uuid
}

/// Send a request and decode the JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).expect("Response body is not JSON")
    };
    (status, json)
}

/// Build a `POST /v1/token` request with an optional raw Authorization value.
pub fn token_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/v1/token");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Register a user through the API and return the response.
pub async fn register_user(
    app: &Router,
    email: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    send(
        app,
        json_request(
            "POST",
            "/v1/register",
            serde_json::json!({ "email": email, "password": password }),
        ),
    )
    .await
}

/// Register the default test user and return its refresh token.
pub async fn register_default_user(app: &Router) -> serde_json::Value {
    let (status, json) = register_user(app, TEST_EMAIL, TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "registration failed: {json}");
    json
}

pub fn assert_failure(json: &serde_json::Value, message: &str) {
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], message);
}
