// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{
    DailyLog, DoseEvent, NutritionEntry, NutritionTargets, OnboardingForm, Profile, SymptomEntry,
    SymptomUpdate, WeightSample,
};
use crate::services::profile::{derive_targets, validate_weight};
use crate::services::{CurrentDose, Dashboard};
use crate::time_utils::{parse_calendar_date, today_utc};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", post(create_profile).get(get_profile))
        .route("/api/profile/onboarding", put(complete_onboarding))
        .route("/api/profile/weight", put(update_weight))
        .route("/api/targets", get(get_targets))
        .route("/api/weights", post(record_weight).get(list_weights))
        .route("/api/nutrition", post(record_nutrition).get(get_nutrition))
        .route("/api/symptoms", put(record_symptoms).get(get_symptoms))
        .route("/api/doses", post(record_dose).get(list_doses))
        .route("/api/doses/current", get(get_current_dose))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/account", delete(delete_account))
}

/// Parse an optional `YYYY-MM-DD` parameter, defaulting to today (UTC).
fn resolve_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        None => Ok(today_utc()),
        Some(raw) => parse_calendar_date(raw).ok_or_else(|| {
            AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", raw))
        }),
    }
}

#[derive(Deserialize)]
struct DateQuery {
    date: Option<String>,
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct CreateProfileRequest {
    email: Option<String>,
    display_name: Option<String>,
}

/// Create the caller's profile. Idempotent.
async fn create_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles
        .create_profile(&user.user_id, body.email, body.display_name)
        .await?;
    Ok(Json(profile))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Profile>> {
    Ok(Json(state.profiles.get_profile(&user.user_id).await?))
}

async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(form): Json<OnboardingForm>,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles
        .complete_onboarding(&user.user_id, &form)
        .await?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
struct UpdateWeightRequest {
    weight_kg: f64,
}

async fn update_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateWeightRequest>,
) -> Result<Json<Profile>> {
    let profile = state
        .profiles
        .update_weight(&user.user_id, body.weight_kg)
        .await?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
struct TargetsQuery {
    weight_kg: f64,
}

/// Preview targets for a weight without touching the profile.
async fn get_targets(Query(params): Query<TargetsQuery>) -> Result<Json<NutritionTargets>> {
    validate_weight(params.weight_kg)?;
    Ok(Json(derive_targets(params.weight_kg)))
}

// ─── Weight History ──────────────────────────────────────────

#[derive(Deserialize)]
struct RecordWeightRequest {
    weight_kg: f64,
    waist_cm: Option<f64>,
    date: Option<String>,
}

async fn record_weight(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<RecordWeightRequest>,
) -> Result<(StatusCode, Json<WeightSample>)> {
    let date = resolve_date(body.date.as_deref())?;
    let sample = state
        .profiles
        .record_weight(&user.user_id, body.weight_kg, date, body.waist_cm)
        .await?;
    Ok((StatusCode::CREATED, Json(sample)))
}

#[derive(Deserialize)]
struct WeightsQuery {
    /// Cursor for forward pagination (opaque token).
    cursor: Option<String>,
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_per_page() -> u32 {
    50
}

const MAX_PER_PAGE: u32 = 100;

fn parse_cursor(cursor: Option<&str>) -> Result<Option<String>> {
    cursor
        .map(|raw| {
            let invalid_cursor = || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let sort_key = String::from_utf8(decoded).map_err(|_| invalid_cursor())?;

            // Sort keys always start with the calendar date.
            match sort_key.split_once('#') {
                Some((date, _)) if parse_calendar_date(date).is_some() => Ok(sort_key),
                _ => Err(invalid_cursor()),
            }
        })
        .transpose()
}

fn encode_cursor(sort_key: &str) -> String {
    URL_SAFE_NO_PAD.encode(sort_key)
}

#[derive(Serialize)]
pub struct WeightsResponse {
    pub weights: Vec<WeightSample>,
    pub per_page: u32,
    pub next_cursor: Option<String>,
}

/// Weigh-ins newest first, cursor-paginated.
async fn list_weights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<WeightsQuery>,
) -> Result<Json<WeightsResponse>> {
    if params.per_page == 0 {
        return Err(AppError::BadRequest(
            "per_page must be greater than 0".to_string(),
        ));
    }
    let limit = params.per_page.min(MAX_PER_PAGE);
    let cursor = parse_cursor(params.cursor.as_deref())?;

    tracing::debug!(
        user_id = %user.user_id,
        cursor = ?cursor,
        per_page = limit,
        "Fetching weight history"
    );

    // Fetch one extra item to determine if another page is available.
    let mut weights = state
        .profiles
        .list_weights(&user.user_id, cursor.as_deref(), limit.saturating_add(1))
        .await?;

    let has_more = weights.len() > limit as usize;
    if has_more {
        weights.truncate(limit as usize);
    }
    let next_cursor = if has_more {
        weights.last().map(|w| encode_cursor(&w.sort_key))
    } else {
        None
    };

    Ok(Json(WeightsResponse {
        weights,
        per_page: limit,
        next_cursor,
    }))
}

// ─── Daily Logs ──────────────────────────────────────────────

#[derive(Deserialize)]
struct NutritionRequest {
    date: Option<String>,
    #[serde(flatten)]
    entry: NutritionEntry,
}

/// Add an entry to the day's totals. Returns the new totals.
async fn record_nutrition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NutritionRequest>,
) -> Result<Json<DailyLog>> {
    let date = resolve_date(body.date.as_deref())?;
    let totals = state
        .daily_logs
        .record_nutrition(&user.user_id, date, &body.entry)
        .await?;
    Ok(Json(totals))
}

async fn get_nutrition(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<DateQuery>,
) -> Result<Json<DailyLog>> {
    let date = resolve_date(params.date.as_deref())?;
    Ok(Json(
        state.daily_logs.get_daily_totals(&user.user_id, date).await?,
    ))
}

#[derive(Deserialize)]
struct SymptomsRequest {
    date: Option<String>,
    #[serde(flatten)]
    update: SymptomUpdate,
}

/// Set the day's symptom scores. Only the fields sent are changed.
async fn record_symptoms(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SymptomsRequest>,
) -> Result<Json<SymptomEntry>> {
    let date = resolve_date(body.date.as_deref())?;
    let entry = state
        .daily_logs
        .record_symptoms(&user.user_id, date, &body.update)
        .await?;
    Ok(Json(entry))
}

async fn get_symptoms(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<DateQuery>,
) -> Result<Json<SymptomEntry>> {
    let date = resolve_date(params.date.as_deref())?;
    Ok(Json(state.daily_logs.get_symptoms(&user.user_id, date).await?))
}

// ─── Doses ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RecordDoseRequest {
    dose_mg: f64,
    date: Option<String>,
    notes: Option<String>,
}

async fn record_dose(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<RecordDoseRequest>,
) -> Result<(StatusCode, Json<DoseEvent>)> {
    let date = resolve_date(body.date.as_deref())?;
    let event = state
        .doses
        .record_dose(&user.user_id, body.dose_mg, date, body.notes)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[derive(Deserialize)]
struct DosesQuery {
    #[serde(default = "default_dose_limit")]
    limit: u32,
}

fn default_dose_limit() -> u32 {
    20
}

#[derive(Serialize)]
pub struct DosesResponse {
    pub doses: Vec<DoseEvent>,
}

async fn list_doses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<DosesQuery>,
) -> Result<Json<DosesResponse>> {
    let doses = state.doses.list_doses(&user.user_id, params.limit).await?;
    Ok(Json(DosesResponse { doses }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CurrentDoseResponse {
    /// `null` until the first dose is recorded.
    pub current: Option<CurrentDose>,
}

async fn get_current_dose(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CurrentDoseResponse>> {
    let current = state.doses.get_current_dose(&user.user_id).await?;
    Ok(Json(CurrentDoseResponse { current }))
}

// ─── Dashboard ───────────────────────────────────────────────

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<DateQuery>,
) -> Result<Json<Dashboard>> {
    let date = resolve_date(params.date.as_deref())?;
    Ok(Json(
        state.dashboard.load_dashboard(&user.user_id, date).await?,
    ))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub deleted_count: usize,
}

/// Delete the user's profile and all associated records.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    let deleted_count = state.profiles.delete_account(&user.user_id).await?;

    Ok(Json(DeleteAccountResponse {
        success: true,
        deleted_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_date() {
        assert_eq!(
            resolve_date(Some("2024-01-08")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
        assert!(matches!(
            resolve_date(Some("08/01/2024")),
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(resolve_date(None).unwrap(), today_utc());
    }

    #[test]
    fn test_cursor_round_trip_and_rejects_garbage() {
        let key = "2024-03-01#2024-03-01T08:00:00.000000000Z";
        let encoded = encode_cursor(key);
        assert_eq!(parse_cursor(Some(&encoded)).unwrap().as_deref(), Some(key));

        assert!(parse_cursor(Some("!!!")).is_err());
        let not_a_key = URL_SAFE_NO_PAD.encode("hello");
        assert!(parse_cursor(Some(&not_a_key)).is_err());
        assert_eq!(parse_cursor(None).unwrap(), None);
    }
}
