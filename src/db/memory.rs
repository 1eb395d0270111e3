// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store backed by `DashMap`.
//!
//! Per-day updates run under the map's entry lock, so concurrent increments
//! for the same (user, day) never lose writes.

use crate::db::HealthStore;
use crate::error::AppError;
use crate::models::{
    DailyLog, DoseEvent, NutritionEntry, Profile, SymptomEntry, SymptomUpdate, WeightSample,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::Arc;

type DayKey = (String, NaiveDate);

/// In-memory database. Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryDb {
    profiles: Arc<DashMap<String, Profile>>,
    daily_logs: Arc<DashMap<DayKey, DailyLog>>,
    symptoms: Arc<DashMap<DayKey, SymptomEntry>>,
    weights: Arc<DashMap<String, Vec<WeightSample>>>,
    doses: Arc<DashMap<String, Vec<DoseEvent>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthStore for MemoryDb {
    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.get(user_id).map(|p| p.value().clone()))
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn get_daily_log(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DailyLog>, AppError> {
        Ok(self
            .daily_logs
            .get(&(user_id.to_string(), date))
            .map(|log| log.value().clone()))
    }

    async fn add_nutrition(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: &NutritionEntry,
        now: DateTime<Utc>,
    ) -> Result<DailyLog, AppError> {
        let mut log = self
            .daily_logs
            .entry((user_id.to_string(), date))
            .or_insert_with(|| DailyLog::empty(user_id, date));
        log.add(entry, now);
        Ok(log.value().clone())
    }

    async fn get_symptoms(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Option<SymptomEntry>, AppError> {
        Ok(self
            .symptoms
            .get(&(user_id.to_string(), date))
            .map(|entry| entry.value().clone()))
    }

    async fn apply_symptoms(
        &self,
        user_id: &str,
        date: NaiveDate,
        update: &SymptomUpdate,
        now: DateTime<Utc>,
    ) -> Result<SymptomEntry, AppError> {
        let mut entry = self
            .symptoms
            .entry((user_id.to_string(), date))
            .or_insert_with(|| SymptomEntry::empty(user_id, date));
        entry.apply(update, now);
        Ok(entry.value().clone())
    }

    async fn append_weight_sample(&self, sample: &WeightSample) -> Result<(), AppError> {
        // Hold the profile lock across both writes so readers never see the
        // sample without the matching current weight.
        let mut profile = self.profiles.get_mut(&sample.user_id).ok_or_else(|| {
            AppError::NotFound(format!("Profile {} not found", sample.user_id))
        })?;

        self.weights
            .entry(sample.user_id.clone())
            .or_default()
            .push(sample.clone());

        profile.current_weight_kg = Some(sample.weight_kg);
        profile.updated_at = sample.recorded_at;
        Ok(())
    }

    async fn list_weight_samples(
        &self,
        user_id: &str,
        before: Option<&str>,
        limit: u32,
    ) -> Result<Vec<WeightSample>, AppError> {
        let Some(samples) = self.weights.get(user_id) else {
            return Ok(vec![]);
        };

        let mut page: Vec<WeightSample> = samples
            .iter()
            .filter(|s| before.map_or(true, |bound| s.sort_key.as_str() < bound))
            .cloned()
            .collect();
        page.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
        page.truncate(limit as usize);
        Ok(page)
    }

    async fn append_dose_event(&self, event: &DoseEvent) -> Result<(), AppError> {
        self.doses
            .entry(event.user_id.clone())
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn list_dose_events(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<DoseEvent>, AppError> {
        let Some(events) = self.doses.get(user_id) else {
            return Ok(vec![]);
        };

        let mut events = events.value().clone();
        events.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        let before = self.daily_logs.len();
        self.daily_logs.retain(|(owner, _), _| owner != user_id);
        deleted_count += before - self.daily_logs.len();

        let before = self.symptoms.len();
        self.symptoms.retain(|(owner, _), _| owner != user_id);
        deleted_count += before - self.symptoms.len();

        if let Some((_, samples)) = self.weights.remove(user_id) {
            deleted_count += samples.len();
        }
        if let Some((_, events)) = self.doses.remove(user_id) {
            deleted_count += events.len();
        }
        if self.profiles.remove(user_id).is_some() {
            deleted_count += 1;
        }

        tracing::info!(user_id, deleted_count, "User data deletion complete");
        Ok(deleted_count)
    }
}
