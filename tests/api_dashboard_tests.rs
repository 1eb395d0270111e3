// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard and alert evaluation over HTTP.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{authed_request, body_json, create_test_app, onboarding_form};

async fn onboard(app: &axum::Router, user_id: &str, appetite: &str, difficulties: &[&str]) {
    for (method, uri, body) in [
        ("POST", "/api/profile", json!({})),
        (
            "PUT",
            "/api/profile/onboarding",
            onboarding_form(appetite, difficulties),
        ),
    ] {
        let response = app
            .clone()
            .oneshot(authed_request(method, uri, user_id, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

async fn log_protein(app: &axum::Router, user_id: &str, grams: f64) {
    let response = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/nutrition",
            user_id,
            Some(json!({ "date": "2024-01-03", "protein_g": grams })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_dashboard_requires_onboarding() {
    let (app, state) = create_test_app();
    state.profiles.create_profile("u1", None, None).await.unwrap();

    let response = app
        .oneshot(authed_request("GET", "/api/dashboard", "u1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "onboarding_required");
}

#[tokio::test]
async fn test_implausible_weight_never_reaches_dashboard() {
    let (app, state) = create_test_app();
    state.profiles.create_profile("u1", None, None).await.unwrap();
    let mut form = onboarding_form("Normal", &["Sono ruim"]);
    form["weight_kg"] = json!(0.3);

    let response = app
        .clone()
        .oneshot(authed_request("PUT", "/api/profile/onboarding", "u1", Some(form)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "validation_error");

    let response = app
        .oneshot(authed_request("GET", "/api/dashboard", "u1", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_low_appetite_alert() {
    let (app, _) = create_test_app();
    onboard(&app, "u1", "Zero fome mesmo", &["Sono ruim"]).await;
    log_protein(&app, "u1", 30.0).await;

    let response = app
        .oneshot(authed_request("GET", "/api/dashboard?date=2024-01-03", "u1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["targets"]["protein_g"], 98);
    assert_eq!(json["protein"]["class"], "low");
    let alerts = json["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["event"]["kind"], "low_appetite");
    assert_eq!(alerts[0]["title"], "Modo Sem Fome Ativado!");
}

#[tokio::test]
async fn test_low_protein_alert_with_normal_appetite() {
    let (app, _) = create_test_app();
    onboard(&app, "u1", "Normal", &["Comer proteína"]).await;
    log_protein(&app, "u1", 30.0).await;

    let response = app
        .oneshot(authed_request("GET", "/api/dashboard?date=2024-01-03", "u1", None))
        .await
        .unwrap();

    let json = body_json(response).await;
    let alerts = json["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["event"]["kind"], "low_protein");
    assert_eq!(json["protein_focus"], true);
    assert_eq!(json["hydration_focus"], false);
}

#[tokio::test]
async fn test_on_track_day_has_no_alerts() {
    let (app, _) = create_test_app();
    onboard(&app, "u1", "Normal", &["Beber água"]).await;
    log_protein(&app, "u1", 75.0).await;
    app.clone()
        .oneshot(authed_request(
            "POST",
            "/api/nutrition",
            "u1",
            Some(json!({ "date": "2024-01-03", "water_ml": 1500 })),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(authed_request("GET", "/api/dashboard?date=2024-01-03", "u1", None))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert!(json["alerts"].as_array().unwrap().is_empty());
    assert_eq!(json["protein"]["class"], "high");
    assert_eq!(json["water"]["class"], "high");
    assert_eq!(json["hydration_focus"], true);
}
