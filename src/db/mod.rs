// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Domain services talk to storage only through [`HealthStore`], so the same
//! logic runs against Firestore in production and [`MemoryDb`] in tests or
//! local development.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{
    DailyLog, DoseEvent, NutritionEntry, Profile, SymptomEntry, SymptomUpdate, WeightSample,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Collection names as constants.
pub mod collections {
    pub const PROFILES: &str = "profiles";
    /// Nutrition totals, one document per (user, day)
    pub const DAILY_LOGS: &str = "daily_logs";
    /// Symptom scores, one document per (user, day)
    pub const SYMPTOM_ENTRIES: &str = "symptom_entries";
    pub const WEIGHT_SAMPLES: &str = "weight_samples";
    pub const DOSE_EVENTS: &str = "dose_events";
}

/// Document ID for per-day records.
pub fn day_document_id(user_id: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}",
        urlencoding::encode(user_id),
        date.format(crate::time_utils::DATE_FORMAT)
    )
}

/// Storage operations used by the domain services.
///
/// Per-day mutations (`add_nutrition`, `apply_symptoms`) and
/// `append_weight_sample` must be atomic with respect to concurrent calls
/// for the same key.
#[async_trait]
pub trait HealthStore: Send + Sync {
    // ─── Profiles ────────────────────────────────────────────────

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError>;

    /// Create or replace a profile document.
    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError>;

    // ─── Daily records ───────────────────────────────────────────

    async fn get_daily_log(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyLog>, AppError>;

    /// Add an entry to the day's totals, creating the record if needed.
    /// Returns the updated totals.
    async fn add_nutrition(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: &NutritionEntry,
        now: DateTime<Utc>,
    ) -> Result<DailyLog, AppError>;

    async fn get_symptoms(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<SymptomEntry>, AppError>;

    /// Overwrite the provided scores for the day, creating the record if needed.
    async fn apply_symptoms(
        &self,
        user_id: &str,
        date: NaiveDate,
        update: &SymptomUpdate,
        now: DateTime<Utc>,
    ) -> Result<SymptomEntry, AppError>;

    // ─── Weight ──────────────────────────────────────────────────

    /// Store a sample and set the owner's `current_weight_kg` to it.
    async fn append_weight_sample(&self, sample: &WeightSample) -> Result<(), AppError>;

    /// Samples newest first. `before` is an exclusive `sort_key` bound.
    async fn list_weight_samples(
        &self,
        user_id: &str,
        before: Option<&str>,
        limit: u32,
    ) -> Result<Vec<WeightSample>, AppError>;

    // ─── Doses ───────────────────────────────────────────────────

    async fn append_dose_event(&self, event: &DoseEvent) -> Result<(), AppError>;

    /// Events newest first by administration date, then write time.
    async fn list_dose_events(&self, user_id: &str, limit: u32)
        -> Result<Vec<DoseEvent>, AppError>;

    // ─── Account ─────────────────────────────────────────────────

    /// Delete every record owned by the user. Returns the number removed.
    async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError>;
}
