// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile & goals service.
//!
//! Owns the profile record: signup creation, onboarding (which fixes the
//! nutrition targets), and weight updates.

use crate::db::HealthStore;
use crate::error::{AppError, Result};
use crate::models::{
    AppetiteLevel, Difficulty, NotificationPreference, NutritionTargets, OnboardingAnswers,
    OnboardingForm, Profile, WeightSample,
};
use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Protein goal per kilogram of body weight.
pub const PROTEIN_G_PER_KG: f64 = 1.4;
/// Fixed daily fiber goal.
pub const FIBER_TARGET_G: u32 = 25;
/// Fixed daily water goal.
pub const WATER_TARGET_ML: u32 = 2000;

/// Daily targets for a body weight. Pure.
pub fn derive_targets(current_weight_kg: f64) -> NutritionTargets {
    NutritionTargets {
        protein_g: (current_weight_kg * PROTEIN_G_PER_KG).round() as u32,
        fiber_g: FIBER_TARGET_G,
        water_ml: WATER_TARGET_ML,
    }
}

/// Smallest accepted body weight.
pub const MIN_WEIGHT_KG: f64 = 20.0;
/// Largest accepted body weight.
pub const MAX_WEIGHT_KG: f64 = 500.0;

/// Reject weights outside `MIN_WEIGHT_KG..=MAX_WEIGHT_KG`.
///
/// Every accepted weight derives a non-zero protein target.
pub fn validate_weight(weight_kg: f64) -> Result<()> {
    match weight_out_of_range(weight_kg) {
        Some(msg) => Err(AppError::Validation(msg)),
        None => Ok(()),
    }
}

fn weight_out_of_range(weight_kg: f64) -> Option<String> {
    if (MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
        None
    } else {
        Some(format!(
            "weight must be between {} and {} kg, got {}",
            MIN_WEIGHT_KG, MAX_WEIGHT_KG, weight_kg
        ))
    }
}

/// Check that every question was answered and parse the enumerated answers.
///
/// All problems are reported in one error.
pub fn validate_onboarding(form: &OnboardingForm) -> Result<OnboardingAnswers> {
    let mut missing: Vec<&'static str> = Vec::new();
    let mut invalid: Vec<String> = Vec::new();

    let mut text = |name: &'static str, value: &Option<String>| -> String {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                missing.push(name);
                String::new()
            }
        }
    };

    let main_goal = text("main_goal", &form.main_goal);
    let appetite_raw = text("appetite_level", &form.appetite_level);
    let protein_frequency = text("protein_frequency", &form.protein_frequency);
    let fiber_frequency = text("fiber_frequency", &form.fiber_frequency);
    let energy_level = text("energy_level", &form.energy_level);
    let nausea_experience = text("nausea_experience", &form.nausea_experience);
    let water_habit = text("water_habit", &form.water_habit);
    let physical_activity = text("physical_activity", &form.physical_activity);
    let notification_raw = text("notification_preference", &form.notification_preference);
    let treatment_status = text("treatment_status", &form.treatment_status);

    if form.difficulties.is_empty() {
        missing.push("difficulties");
    }

    let weight_kg = match form.weight_kg {
        Some(w) => match weight_out_of_range(w) {
            None => w,
            Some(msg) => {
                invalid.push(format!("weight_kg: {}", msg));
                0.0
            }
        },
        None => {
            missing.push("weight_kg");
            0.0
        }
    };

    let appetite_level = if appetite_raw.is_empty() {
        None
    } else {
        match appetite_raw.parse::<AppetiteLevel>() {
            Ok(level) => Some(level),
            Err(e) => {
                invalid.push(format!("appetite_level: {}", e));
                None
            }
        }
    };

    let notification_preference = if notification_raw.is_empty() {
        None
    } else {
        match notification_raw.parse::<NotificationPreference>() {
            Ok(pref) => Some(pref),
            Err(e) => {
                invalid.push(format!("notification_preference: {}", e));
                None
            }
        }
    };

    let mut difficulties = BTreeSet::new();
    for raw in &form.difficulties {
        match raw.trim().parse::<Difficulty>() {
            Ok(d) => {
                difficulties.insert(d);
            }
            Err(e) => invalid.push(format!("difficulties: {}", e)),
        }
    }

    if !missing.is_empty() {
        invalid.insert(0, format!("missing answers: {}", missing.join(", ")));
    }

    match (appetite_level, notification_preference) {
        (Some(appetite_level), Some(notification_preference)) if invalid.is_empty() => {
            Ok(OnboardingAnswers {
                main_goal,
                appetite_level,
                protein_frequency,
                fiber_frequency,
                energy_level,
                nausea_experience,
                water_habit,
                physical_activity,
                difficulties,
                notification_preference,
                weight_kg,
                treatment_status,
            })
        }
        _ => Err(AppError::Validation(invalid.join("; "))),
    }
}

/// Profile operations over a `HealthStore`.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn HealthStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Create the profile at signup. Returns the stored profile unchanged if
    /// one already exists.
    pub async fn create_profile(
        &self,
        user_id: &str,
        email: Option<String>,
        display_name: Option<String>,
    ) -> Result<Profile> {
        if let Some(existing) = self.store.get_profile(user_id).await? {
            tracing::debug!(user_id, "Profile already exists");
            return Ok(existing);
        }

        let profile = Profile::new(user_id, email, display_name, Utc::now());
        self.store.upsert_profile(&profile).await?;

        tracing::info!(user_id, "Profile created");
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Profile> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user_id)))
    }

    /// Validate the questionnaire, derive targets and mark onboarding done.
    ///
    /// Answers, weight, targets and the completion flag are written together
    /// in a single profile write.
    pub async fn complete_onboarding(
        &self,
        user_id: &str,
        form: &OnboardingForm,
    ) -> Result<Profile> {
        let answers = validate_onboarding(form)?;
        let mut profile = self.get_profile(user_id).await?;

        let targets = derive_targets(answers.weight_kg);
        profile.current_weight_kg = Some(answers.weight_kg);
        profile.starting_weight_kg = Some(answers.weight_kg);
        profile.targets = targets;
        profile.onboarding = Some(answers);
        profile.onboarding_completed = true;
        profile.updated_at = Utc::now();

        self.store.upsert_profile(&profile).await?;

        tracing::info!(
            user_id,
            protein_target_g = targets.protein_g,
            fiber_target_g = targets.fiber_g,
            water_target_ml = targets.water_ml,
            "Onboarding completed"
        );
        Ok(profile)
    }

    /// Set the profile's current weight. Targets stay as derived at onboarding.
    pub async fn update_weight(&self, user_id: &str, weight_kg: f64) -> Result<Profile> {
        validate_weight(weight_kg)?;
        let mut profile = self.get_profile(user_id).await?;

        profile.current_weight_kg = Some(weight_kg);
        profile.updated_at = Utc::now();
        self.store.upsert_profile(&profile).await?;

        tracing::debug!(user_id, weight_kg, "Current weight updated");
        Ok(profile)
    }

    /// Append a weigh-in and sync the profile's current weight to it.
    pub async fn record_weight(
        &self,
        user_id: &str,
        weight_kg: f64,
        date: NaiveDate,
        waist_cm: Option<f64>,
    ) -> Result<WeightSample> {
        validate_weight(weight_kg)?;
        if let Some(waist) = waist_cm {
            if !(waist.is_finite() && waist > 0.0) {
                return Err(AppError::Validation(format!(
                    "waist_cm must be greater than 0, got {}",
                    waist
                )));
            }
        }

        let sample = WeightSample::new(user_id, date, weight_kg, waist_cm, Utc::now());
        self.store.append_weight_sample(&sample).await?;

        tracing::info!(user_id, weight_kg, %date, "Weight recorded");
        Ok(sample)
    }

    /// Weigh-ins newest first. `before` is the `sort_key` of the last sample
    /// of the previous page.
    pub async fn list_weights(
        &self,
        user_id: &str,
        before: Option<&str>,
        limit: u32,
    ) -> Result<Vec<WeightSample>> {
        self.store.list_weight_samples(user_id, before, limit).await
    }

    /// Remove the profile and every record the user owns.
    pub async fn delete_account(&self, user_id: &str) -> Result<usize> {
        tracing::info!(user_id, "Deleting account data");
        self.store.delete_user_data(user_id).await
    }
}
