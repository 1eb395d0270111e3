// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use monjaro_up::config::Config;
use monjaro_up::db::{FirestoreDb, MemoryDb};
use monjaro_up::middleware::auth::create_jwt;
use monjaro_up::routes::create_router;
use monjaro_up::AppState;
use std::sync::Arc;

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

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        Config::test_default(),
        Arc::new(MemoryDb::new()),
    ));
    (create_router(state.clone()), state)
}

/// Create a test app whose store is an unconnected Firestore client.
#[allow(dead_code)]
pub fn create_offline_firestore_app() -> axum::Router {
    let state = Arc::new(AppState::new(
        Config::test_default(),
        Arc::new(FirestoreDb::new_mock()),
    ));
    create_router(state)
}

/// Session token for `user_id` signed with the test key.
#[allow(dead_code)]
pub fn test_token(user_id: &str) -> String {
    create_jwt(user_id, &Config::test_default().jwt_signing_key).expect("Failed to sign JWT")
}

/// Build an authenticated request with an optional JSON body.
#[allow(dead_code)]
pub fn authed_request(
    method: &str,
    uri: &str,
    user_id: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", test_token(user_id)));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A complete onboarding questionnaire for a 70 kg user.
#[allow(dead_code)]
pub fn onboarding_form(appetite: &str, difficulties: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "main_goal": "Emagrecer com saúde",
        "appetite_level": appetite,
        "protein_frequency": "Às vezes",
        "fiber_frequency": "Raramente",
        "energy_level": "Média",
        "nausea_experience": "Às vezes",
        "water_habit": "Esqueço bastante",
        "physical_activity": "Raramente",
        "difficulties": difficulties,
        "notification_preference": "Só o essencial",
        "weight_kg": 70.0,
        "treatment_status": "Sim"
    })
}
