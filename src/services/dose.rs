// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dose scheduler: records administrations and computes the next due date.

use crate::db::HealthStore;
use crate::error::{AppError, Result};
use crate::models::{DoseEvent, DoseMg};
use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Days between administrations.
pub const DOSE_INTERVAL_DAYS: u64 = 7;
/// Upper bound on `list_doses` page size.
pub const MAX_DOSE_LIST: u32 = 100;

/// Next administration date: a fixed week after the last one.
pub fn next_due_date(last_administered: NaiveDate) -> NaiveDate {
    last_administered
        .checked_add_days(Days::new(DOSE_INTERVAL_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// Most recent dose and when the next one is due.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CurrentDose {
    pub dose_mg: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub last_administered: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub next_due: NaiveDate,
}

impl From<&DoseEvent> for CurrentDose {
    fn from(event: &DoseEvent) -> Self {
        Self {
            dose_mg: event.dose_mg.mg(),
            last_administered: event.administered_on,
            next_due: next_due_date(event.administered_on),
        }
    }
}

#[derive(Clone)]
pub struct DoseScheduler {
    store: Arc<dyn HealthStore>,
}

impl DoseScheduler {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Validate and append a dose event.
    pub async fn record_dose(
        &self,
        user_id: &str,
        dose_mg: f64,
        administered_on: NaiveDate,
        notes: Option<String>,
    ) -> Result<DoseEvent> {
        let dose = DoseMg::try_from(dose_mg).map_err(|e| AppError::Validation(e.to_string()))?;
        let notes = notes.filter(|n| !n.trim().is_empty());

        if self.store.get_profile(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Profile {} not found", user_id)));
        }

        let event = DoseEvent::new(user_id, dose, administered_on, notes, Utc::now());
        self.store.append_dose_event(&event).await?;

        tracing::info!(
            user_id,
            dose_mg = dose.mg(),
            %administered_on,
            next_due = %next_due_date(administered_on),
            "Dose recorded"
        );
        Ok(event)
    }

    /// Latest dose by administration date, or `None` if none was recorded.
    pub async fn get_current_dose(&self, user_id: &str) -> Result<Option<CurrentDose>> {
        let latest = self.store.list_dose_events(user_id, 1).await?;
        Ok(latest.first().map(CurrentDose::from))
    }

    /// Dose history, newest first.
    pub async fn list_doses(&self, user_id: &str, limit: u32) -> Result<Vec<DoseEvent>> {
        self.store
            .list_dose_events(user_id, limit.clamp(1, MAX_DOSE_LIST))
            .await
    }
}
