// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-day nutrition totals and symptom scores.
//!
//! Both records are keyed by (user, calendar date). Nutrition is accumulated
//! by addition; symptoms are replaced field by field.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Highest symptom severity.
pub const MAX_SYMPTOM_SCORE: u8 = 5;

/// Nutrition totals for one user on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyLog {
    pub user_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub water_ml: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub activity_min: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DailyLog {
    /// Zero totals for a day with no entries.
    pub fn empty(user_id: &str, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
            protein_g: 0.0,
            fiber_g: 0.0,
            water_ml: 0.0,
            calories: 0.0,
            activity_min: 0,
            updated_at: None,
        }
    }

    /// Add an entry's amounts to the running totals.
    pub fn add(&mut self, entry: &NutritionEntry, now: DateTime<Utc>) {
        self.protein_g += entry.protein_g.unwrap_or(0.0);
        self.fiber_g += entry.fiber_g.unwrap_or(0.0);
        self.water_ml += entry.water_ml.unwrap_or(0.0);
        self.calories += entry.calories.unwrap_or(0.0);
        self.activity_min = self
            .activity_min
            .saturating_add(entry.activity_min.unwrap_or(0));
        self.updated_at = Some(now);
    }
}

/// Amounts consumed since the last entry. Absent fields count as zero.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NutritionEntry {
    #[validate(range(min = 0.0))]
    pub protein_g: Option<f64>,
    #[validate(range(min = 0.0))]
    pub fiber_g: Option<f64>,
    #[validate(range(min = 0.0))]
    pub water_ml: Option<f64>,
    #[validate(range(min = 0.0))]
    pub calories: Option<f64>,
    pub activity_min: Option<u32>,
}

impl NutritionEntry {
    pub fn new(protein_g: f64, fiber_g: f64, water_ml: f64) -> Self {
        Self {
            protein_g: Some(protein_g),
            fiber_g: Some(fiber_g),
            water_ml: Some(water_ml),
            ..Default::default()
        }
    }

    /// NaN and infinities slip through range checks.
    pub fn all_finite(&self) -> bool {
        [self.protein_g, self.fiber_g, self.water_ml, self.calories]
            .into_iter()
            .flatten()
            .all(f64::is_finite)
    }
}

/// Symptom severities (0–5) for one user on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SymptomEntry {
    pub user_id: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    #[serde(default)]
    pub nausea: u8,
    #[serde(default)]
    pub abdominal_pain: u8,
    #[serde(default)]
    pub weakness: u8,
    #[serde(default)]
    pub constipation: u8,
    #[serde(default)]
    pub diarrhea: u8,
    #[serde(default)]
    pub reflux: u8,
    #[serde(default)]
    pub dizziness: u8,
    #[serde(default)]
    pub headache: u8,
    #[serde(default)]
    pub appetite_loss: u8,
    pub notes: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SymptomEntry {
    pub fn empty(user_id: &str, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
            nausea: 0,
            abdominal_pain: 0,
            weakness: 0,
            constipation: 0,
            diarrhea: 0,
            reflux: 0,
            dizziness: 0,
            headache: 0,
            appetite_loss: 0,
            notes: None,
            updated_at: None,
        }
    }

    /// Overwrite the provided scores; omitted ones keep their value.
    pub fn apply(&mut self, update: &SymptomUpdate, now: DateTime<Utc>) {
        let fields: [(&mut u8, Option<i32>); 9] = [
            (&mut self.nausea, update.nausea),
            (&mut self.abdominal_pain, update.abdominal_pain),
            (&mut self.weakness, update.weakness),
            (&mut self.constipation, update.constipation),
            (&mut self.diarrhea, update.diarrhea),
            (&mut self.reflux, update.reflux),
            (&mut self.dizziness, update.dizziness),
            (&mut self.headache, update.headache),
            (&mut self.appetite_loss, update.appetite_loss),
        ];
        for (slot, score) in fields {
            if let Some(score) = score {
                *slot = clamp_score(score);
            }
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
        self.updated_at = Some(now);
    }
}

/// Scores to set for a day. Values outside 0–5 are clamped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymptomUpdate {
    pub nausea: Option<i32>,
    pub abdominal_pain: Option<i32>,
    pub weakness: Option<i32>,
    pub constipation: Option<i32>,
    pub diarrhea: Option<i32>,
    pub reflux: Option<i32>,
    pub dizziness: Option<i32>,
    pub headache: Option<i32>,
    pub appetite_loss: Option<i32>,
    pub notes: Option<String>,
}

pub fn clamp_score(score: i32) -> u8 {
    score.clamp(0, MAX_SYMPTOM_SCORE as i32) as u8
}
