// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod daily_log;
pub mod dose;
pub mod profile;
pub mod weight;

pub use daily_log::{DailyLog, NutritionEntry, SymptomEntry, SymptomUpdate};
pub use dose::{DoseEvent, DoseMg};
pub use profile::{
    AppetiteLevel, Difficulty, NotificationPreference, NutritionTargets, OnboardingAnswers,
    OnboardingForm, Profile,
};
pub use weight::WeightSample;
