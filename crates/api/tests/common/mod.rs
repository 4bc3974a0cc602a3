//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the
//! router without an actual TCP listener, through the same middleware
//! stack production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use campus_api::auth::jwt::{generate_access_token, JwtConfig};
use campus_api::config::ServerConfig;
use campus_api::router::build_app_router;
use campus_api::services::subjects::SubjectService;
use campus_api::state::AppState;
use campus_core::types::DbId;
use campus_db::models::user::{CreateUser, User};
use campus_db::repositories::{SpecialistRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool and production service wiring.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let subjects = Arc::new(SubjectService::with_pg(pool.clone()));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        subjects,
    };
    build_app_router(state, &config)
}

/// Mint an access token for the given user id and role.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    app.oneshot(request("GET", path, None, None)).await.unwrap()
}

pub async fn post_json(
    app: Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(request("POST", path, token, Some(body)))
        .await
        .unwrap()
}

pub async fn post(app: Router, path: &str, token: Option<&str>) -> Response<Body> {
    app.oneshot(request(
        "POST",
        path,
        token,
        Some(serde_json::json!({})),
    ))
    .await
    .unwrap()
}

pub async fn put_json(
    app: Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(request("PUT", path, token, Some(body)))
        .await
        .unwrap()
}

pub async fn delete(app: Router, path: &str, token: Option<&str>) -> Response<Body> {
    app.oneshot(request("DELETE", path, token, None))
        .await
        .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Create a user with the given role.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

/// Create a specialist and return its id.
pub async fn seed_specialist(pool: &PgPool, name: &str) -> DbId {
    SpecialistRepo::create(pool, name).await.unwrap().id
}

/// Create a teacher assigned to the given specialists.
pub async fn seed_teacher(pool: &PgPool, email: &str, specialist_ids: &[DbId]) -> User {
    let user = seed_user(pool, email, "teacher").await;
    for &specialist_id in specialist_ids {
        UserRepo::assign_specialist(pool, user.id, specialist_id)
            .await
            .unwrap();
    }
    user
}
