#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use skillforge_api::{config::Config, create_router, services::AppState};
use std::sync::Arc;
use tower::ServiceExt;

pub fn create_test_app() -> Router {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    // Every test gets its own state over the checked-in catalog
    let config = Config {
        bind_addr: "127.0.0.1:0".to_string(),
        catalog_path: format!("{}/data/courses.json", env!("CARGO_MANIFEST_DIR")),
    };

    let app_state = Arc::new(AppState::new(config).expect("Failed to initialize test app state"));

    create_router(app_state)
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub async fn onboard_profile(
    app: &Router,
    name: &str,
    skill_level: &str,
    interests: &[&str],
) -> serde_json::Value {
    let (status, body) = request(
        app,
        "POST",
        "/api/v1/profiles/",
        Some(json!({
            "name": name,
            "skill_level": skill_level,
            "interests": interests,
        })),
    )
    .await;

    if status != StatusCode::CREATED {
        panic!("onboarding failed: {} {}", status, body);
    }
    body
}
