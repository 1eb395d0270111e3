// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily log aggregator.
//!
//! Nutrition entries are added to the day's totals; symptom scores replace
//! the previous values for the same day. Re-sending a nutrition entry counts
//! it twice, so callers must deliver each entry at most once.

use crate::db::HealthStore;
use crate::error::{AppError, Result};
use crate::models::{DailyLog, NutritionEntry, SymptomEntry, SymptomUpdate};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct DailyLogAggregator {
    store: Arc<dyn HealthStore>,
}

impl DailyLogAggregator {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    async fn require_profile(&self, user_id: &str) -> Result<()> {
        match self.store.get_profile(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Profile {} not found", user_id))),
        }
    }

    /// Add consumed amounts to the day's totals. Returns the new totals.
    pub async fn record_nutrition(
        &self,
        user_id: &str,
        date: NaiveDate,
        entry: &NutritionEntry,
    ) -> Result<DailyLog> {
        entry.validate()?;
        if !entry.all_finite() {
            return Err(AppError::Validation(
                "nutrition amounts must be finite numbers".to_string(),
            ));
        }
        self.require_profile(user_id).await?;

        let log = self
            .store
            .add_nutrition(user_id, date, entry, Utc::now())
            .await?;

        tracing::info!(
            user_id,
            %date,
            protein_g = log.protein_g,
            fiber_g = log.fiber_g,
            water_ml = log.water_ml,
            "Nutrition recorded"
        );
        Ok(log)
    }

    /// Set symptom scores for the day, clamped to 0–5.
    pub async fn record_symptoms(
        &self,
        user_id: &str,
        date: NaiveDate,
        update: &SymptomUpdate,
    ) -> Result<SymptomEntry> {
        self.require_profile(user_id).await?;

        let entry = self
            .store
            .apply_symptoms(user_id, date, update, Utc::now())
            .await?;

        tracing::info!(user_id, %date, "Symptoms recorded");
        Ok(entry)
    }

    /// Totals for the day; zeros when nothing was logged.
    pub async fn get_daily_totals(&self, user_id: &str, date: NaiveDate) -> Result<DailyLog> {
        Ok(self
            .store
            .get_daily_log(user_id, date)
            .await?
            .unwrap_or_else(|| DailyLog::empty(user_id, date)))
    }

    /// Symptom scores for the day; zeros when nothing was logged.
    pub async fn get_symptoms(&self, user_id: &str, date: NaiveDate) -> Result<SymptomEntry> {
        Ok(self
            .store
            .get_symptoms(user_id, date)
            .await?
            .unwrap_or_else(|| SymptomEntry::empty(user_id, date)))
    }
}
