// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use pathy::config::Config;
use pathy::db::{FirestoreDb, MemoryRouteStore, RouteStore};
use pathy::routes::create_router;
use pathy::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection against the emulator.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by an in-memory store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryRouteStore>) {
    let store = Arc::new(MemoryRouteStore::new());
    let state = Arc::new(AppState::new(Config::test_default(), store.clone()));
    (create_router(state.clone()), state, store)
}

/// Create a test app over a caller-supplied store.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: Arc<dyn RouteStore>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::test_default(), store));
    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body and return status + parsed body.
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

#[allow(dead_code)]
pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
