// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard: one read combining targets, the day's progress, dose cadence,
//! weight trend, symptoms and alerts.

use crate::error::{AppError, Result};
use crate::models::{Difficulty, NutritionTargets, SymptomEntry};
use crate::services::dose::CurrentDose;
use crate::services::progress::{evaluate_alerts, AlertEvent, NutrientProgress};
use crate::services::{DailyLogAggregator, DoseScheduler, ProfileService};
use chrono::NaiveDate;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Starting vs current weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WeightSummary {
    pub current_kg: Option<f64>,
    pub starting_kg: Option<f64>,
    /// Positive when weight went down.
    pub loss_kg: Option<f64>,
}

impl WeightSummary {
    pub fn new(current_kg: Option<f64>, starting_kg: Option<f64>) -> Self {
        let loss_kg = match (starting_kg, current_kg) {
            (Some(start), Some(current)) => Some(start - current),
            _ => None,
        };
        Self {
            current_kg,
            starting_kg,
            loss_kg,
        }
    }
}

/// Alert with its display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardAlert {
    pub event: AlertEvent,
    pub title: String,
    pub message: String,
}

impl From<AlertEvent> for DashboardAlert {
    fn from(event: AlertEvent) -> Self {
        Self {
            event,
            title: event.title().to_string(),
            message: event.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Dashboard {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub display_name: String,
    pub targets: NutritionTargets,
    pub protein: NutrientProgress,
    pub fiber: NutrientProgress,
    pub water: NutrientProgress,
    pub current_dose: Option<CurrentDose>,
    pub weight: WeightSummary,
    pub symptoms: SymptomEntry,
    pub alerts: Vec<DashboardAlert>,
    /// "Comer proteína" was listed as a difficulty.
    pub protein_focus: bool,
    /// "Beber água" was listed as a difficulty.
    pub hydration_focus: bool,
}

#[derive(Clone)]
pub struct DashboardService {
    profiles: ProfileService,
    daily_logs: DailyLogAggregator,
    doses: DoseScheduler,
}

impl DashboardService {
    pub fn new(profiles: ProfileService, daily_logs: DailyLogAggregator, doses: DoseScheduler) -> Self {
        Self {
            profiles,
            daily_logs,
            doses,
        }
    }

    pub async fn load_dashboard(&self, user_id: &str, date: NaiveDate) -> Result<Dashboard> {
        let profile = self.profiles.get_profile(user_id).await?;
        if !profile.onboarding_completed {
            return Err(AppError::OnboardingRequired);
        }

        let totals = self.daily_logs.get_daily_totals(user_id, date).await?;
        let symptoms = self.daily_logs.get_symptoms(user_id, date).await?;
        let current_dose = self.doses.get_current_dose(user_id).await?;

        let targets = profile.targets;
        let alerts = evaluate_alerts(&profile, &totals)
            .into_iter()
            .map(DashboardAlert::from)
            .collect::<Vec<_>>();

        tracing::debug!(user_id, %date, alert_count = alerts.len(), "Dashboard loaded");

        Ok(Dashboard {
            date,
            protein: NutrientProgress::new(totals.protein_g, f64::from(targets.protein_g))?,
            fiber: NutrientProgress::new(totals.fiber_g, f64::from(targets.fiber_g))?,
            water: NutrientProgress::new(totals.water_ml, f64::from(targets.water_ml))?,
            current_dose,
            weight: WeightSummary::new(profile.current_weight_kg, profile.starting_weight_kg),
            symptoms,
            alerts,
            protein_focus: profile.has_difficulty(Difficulty::EatingProtein),
            hydration_focus: profile.has_difficulty(Difficulty::DrinkingWater),
            display_name: profile.display_name,
            targets,
        })
    }
}
