//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use notes_api::config::{CorsOrigins, ServerConfig};
use notes_api::router::{build_app_router, App};
use notes_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// CORS is open to any origin (the production default) and the bundled
/// `public/` directory is served as the frontend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: CorsOrigins::Any,
        request_timeout_secs: 30,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public")),
    }
}

/// Build the full application router over the given pool, creating the
/// `notes` table first.
pub async fn build_test_app(pool: PgPool) -> App {
    notes_db::ensure_schema(&pool)
        .await
        .expect("schema bootstrap should succeed");
    build_app_router(AppState { pool }, &test_config())
}

/// Send a request without a body.
pub async fn send(app: App, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a request with a raw JSON body.
pub async fn send_json(
    app: App,
    method: Method,
    uri: &str,
    body: impl Into<String>,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: App, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri).await
}

pub async fn delete(app: App, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri).await
}

pub async fn post_json(app: App, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body.to_string()).await
}

pub async fn put_json(app: App, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body.to_string()).await
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
