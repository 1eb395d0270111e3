// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress evaluator: percent-of-goal, progress classes and alerts.
//!
//! Everything here is pure; callers load the profile and the day's totals.

use crate::error::{AppError, Result};
use crate::models::{DailyLog, Difficulty, Profile};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Below this share of the protein target an alert is raised.
pub const PROTEIN_ALERT_FRACTION: f64 = 0.4;
/// Below this share of the water target a hydration reminder is raised.
pub const WATER_ALERT_FRACTION: f64 = 0.5;

const LOW_UPPER_BOUND: f64 = 40.0;
const MEDIUM_UPPER_BOUND: f64 = 70.0;

/// `min(actual / target * 100, 100)`.
pub fn compute_progress_percent(actual: f64, target: f64) -> Result<f64> {
    if target.is_nan() || target <= 0.0 {
        return Err(AppError::Validation(format!(
            "target must be greater than 0, got {}",
            target
        )));
    }
    Ok((actual / target * 100.0).min(100.0))
}

/// Progress bucket used to color progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ProgressClass {
    Low,
    Medium,
    High,
}

pub fn classify_progress(percent: f64) -> ProgressClass {
    if percent < LOW_UPPER_BOUND {
        ProgressClass::Low
    } else if percent < MEDIUM_UPPER_BOUND {
        ProgressClass::Medium
    } else {
        ProgressClass::High
    }
}

/// One nutrient's progress for the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutrientProgress {
    pub actual: f64,
    pub target: f64,
    pub percent: f64,
    pub class: ProgressClass,
}

impl NutrientProgress {
    pub fn new(actual: f64, target: f64) -> Result<Self> {
        let percent = compute_progress_percent(actual, target)?;
        Ok(Self {
            actual,
            target,
            percent,
            class: classify_progress(percent),
        })
    }
}

/// Advisory shown on the dashboard. Variants are listed in display priority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AlertEvent {
    /// Little or no hunger and protein under 40%: supportive nudge.
    LowAppetite { protein_percent: f64 },
    /// Normal appetite and protein under 40%: warning.
    LowProtein { protein_percent: f64 },
    /// Water listed as a difficulty and intake under 50%.
    Hydration { water_percent: f64 },
}

impl AlertEvent {
    pub fn title(&self) -> &'static str {
        match self {
            AlertEvent::LowAppetite { .. } => "Modo Sem Fome Ativado!",
            AlertEvent::LowProtein { .. } => "Atenção: Ingestão de proteína muito baixa!",
            AlertEvent::Hydration { .. } => "Lembre-se de beber água!",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AlertEvent::LowAppetite { .. } => {
                "Você está com pouca fome, mas precisa manter a ingestão mínima de proteína."
            }
            AlertEvent::LowProtein { .. } => "Tente consumir ao menos 40% da sua meta diária.",
            AlertEvent::Hydration { .. } => {
                "Você ainda não atingiu metade da sua meta de hidratação."
            }
        }
    }
}

/// Share of `target` reached, uncapped for alert math. Zero target gives 0.
fn raw_percent(actual: f64, target: f64) -> f64 {
    if target > 0.0 {
        actual / target * 100.0
    } else {
        0.0
    }
}

/// Alerts for the day, in priority order. Empty when nothing triggers.
pub fn evaluate_alerts(profile: &Profile, daily_log: &DailyLog) -> Vec<AlertEvent> {
    let mut alerts = Vec::new();

    let protein_target = f64::from(profile.targets.protein_g);
    if daily_log.protein_g < protein_target * PROTEIN_ALERT_FRACTION {
        let protein_percent = raw_percent(daily_log.protein_g, protein_target);
        let suppressed = profile
            .appetite_level()
            .is_some_and(|level| level.is_suppressed());

        alerts.push(if suppressed {
            AlertEvent::LowAppetite { protein_percent }
        } else {
            AlertEvent::LowProtein { protein_percent }
        });
    }

    let water_target = f64::from(profile.targets.water_ml);
    if profile.has_difficulty(Difficulty::DrinkingWater)
        && daily_log.water_ml < water_target * WATER_ALERT_FRACTION
    {
        alerts.push(AlertEvent::Hydration {
            water_percent: raw_percent(daily_log.water_ml, water_target),
        });
    }

    alerts
}
