//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use vsa_api::api::{self, AppState};
use vsa_api::config::ApiSettings;
use vsa_api::domain::{ArrayId, Direction, NewVolume, VolumeId};
use vsa_api::store::{MemoryStore, VolumeStore};

/// Application over a fresh in-memory store
pub fn setup_app() -> (Router, Arc<MemoryStore>) {
    setup_app_with(ApiSettings::default())
}

pub fn setup_app_with(settings: ApiSettings) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_default_instance_types());
    let app = api::build_router(AppState::new(store.clone(), settings));
    (app, store)
}

/// Link a child directly in the store, bypassing the API
///
/// Drives cannot be created over HTTP, so tests seed them this way.
pub async fn seed_child(
    store: &MemoryStore,
    array_id: i64,
    direction: Direction,
    size: i64,
) -> VolumeId {
    store
        .create_volume(NewVolume {
            size,
            display_name: Some(format!("seeded-{}", size)),
            display_description: None,
            array_id: ArrayId(array_id),
            direction,
        })
        .await
        .unwrap()
        .id
}

/// Send one request and return status plus JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("X-Auth-Project-Id", "test-project")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Create an array over HTTP and return its id
pub async fn create_array(app: &Router, display_name: &str) -> i64 {
    let body = format!(r#"{{"vsa": {{"displayName": "{}"}}}}"#, display_name);
    let (status, json) = send(app, "POST", "/v1.1/arrays", Some(&body)).await;
    assert_eq!(status, StatusCode::OK, "array creation failed: {}", json);
    json["vsa"]["id"].as_i64().unwrap()
}
