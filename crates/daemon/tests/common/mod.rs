#![allow(dead_code)]

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;

use dataroom_daemon::http_server;
use dataroom_daemon::{ServiceConfig, ServiceState};

/// Run `RUST_LOG=debug cargo test` to see handler logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The full router over an in-memory database and blob store.
pub async fn app() -> (Router, ServiceState) {
    init_tracing();
    let config = ServiceConfig::ephemeral(5001);
    let state = ServiceState::from_config(&config).await.unwrap();
    let http_config = http_server::Config::new("127.0.0.1:5001".parse().unwrap(), None);
    (http_server::router(http_config, state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

pub async fn post_json<B: Serialize>(app: &Router, path: &str, body: &B) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    let (status, body) = send(app, request).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into()))
    };
    (status, value)
}

/// POST and decode a successful response.
pub async fn call<B: Serialize, T: DeserializeOwned>(app: &Router, path: &str, body: &B) -> T {
    let (status, value) = post_json(app, path, body).await;
    assert!(status.is_success(), "{} -> {}: {}", path, status, value);
    serde_json::from_value(value).unwrap()
}

pub async fn post_bytes(app: &Router, path: &str, data: &[u8]) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/pdf")
        .body(Body::from(data.to_vec()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, path: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
