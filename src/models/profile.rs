// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile and onboarding (anamnese) answers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Daily nutrition goals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutritionTargets {
    pub protein_g: u32,
    pub fiber_g: u32,
    pub water_ml: u32,
}

impl NutritionTargets {
    /// Targets assigned at signup, before onboarding.
    pub const SIGNUP_DEFAULT: NutritionTargets = NutritionTargets {
        protein_g: 80,
        fiber_g: 25,
        water_ml: 2000,
    };
}

impl Default for NutritionTargets {
    fn default() -> Self {
        Self::SIGNUP_DEFAULT
    }
}

/// How hungry the user reports feeling on the medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppetiteLevel {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "Quase não sinto fome")]
    BarelyHungry,
    #[serde(rename = "Zero fome mesmo")]
    NoHunger,
    #[serde(rename = "Ainda não comecei a usar")]
    NotStarted,
}

impl AppetiteLevel {
    pub const ALL: [AppetiteLevel; 4] = [
        AppetiteLevel::Normal,
        AppetiteLevel::BarelyHungry,
        AppetiteLevel::NoHunger,
        AppetiteLevel::NotStarted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppetiteLevel::Normal => "Normal",
            AppetiteLevel::BarelyHungry => "Quase não sinto fome",
            AppetiteLevel::NoHunger => "Zero fome mesmo",
            AppetiteLevel::NotStarted => "Ainda não comecei a usar",
        }
    }

    /// Minimal or zero hunger.
    pub fn is_suppressed(self) -> bool {
        matches!(self, AppetiteLevel::BarelyHungry | AppetiteLevel::NoHunger)
    }
}

impl FromStr for AppetiteLevel {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// Day-to-day difficulty the user selected during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Comer proteína")]
    EatingProtein,
    #[serde(rename = "Comer fibra")]
    EatingFiber,
    #[serde(rename = "Beber água")]
    DrinkingWater,
    #[serde(rename = "Lidar com enjoo")]
    Nausea,
    #[serde(rename = "Sono ruim")]
    PoorSleep,
    #[serde(rename = "Falta de energia")]
    LowEnergy,
    #[serde(rename = "Manter rotina")]
    KeepingRoutine,
}

impl Difficulty {
    pub const ALL: [Difficulty; 7] = [
        Difficulty::EatingProtein,
        Difficulty::EatingFiber,
        Difficulty::DrinkingWater,
        Difficulty::Nausea,
        Difficulty::PoorSleep,
        Difficulty::LowEnergy,
        Difficulty::KeepingRoutine,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::EatingProtein => "Comer proteína",
            Difficulty::EatingFiber => "Comer fibra",
            Difficulty::DrinkingWater => "Beber água",
            Difficulty::Nausea => "Lidar com enjoo",
            Difficulty::PoorSleep => "Sono ruim",
            Difficulty::LowEnergy => "Falta de energia",
            Difficulty::KeepingRoutine => "Manter rotina",
        }
    }
}

impl FromStr for Difficulty {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// Reminder preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationPreference {
    #[serde(rename = "Sim, me ajuda")]
    All,
    #[serde(rename = "Só o essencial")]
    EssentialOnly,
    #[serde(rename = "Só lembrete da dose")]
    DoseOnly,
    #[serde(rename = "Não quero notificações")]
    Off,
}

impl NotificationPreference {
    pub const ALL: [NotificationPreference; 4] = [
        NotificationPreference::All,
        NotificationPreference::EssentialOnly,
        NotificationPreference::DoseOnly,
        NotificationPreference::Off,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationPreference::All => "Sim, me ajuda",
            NotificationPreference::EssentialOnly => "Só o essencial",
            NotificationPreference::DoseOnly => "Só lembrete da dose",
            NotificationPreference::Off => "Não quero notificações",
        }
    }
}

impl FromStr for NotificationPreference {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pref| pref.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// An answer that is not one of the offered options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option: {0}")]
pub struct UnknownOption(pub String);

/// Raw questionnaire submission. Every field is optional so that missing
/// answers can be reported together instead of failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardingForm {
    pub main_goal: Option<String>,
    pub appetite_level: Option<String>,
    pub protein_frequency: Option<String>,
    pub fiber_frequency: Option<String>,
    pub energy_level: Option<String>,
    pub nausea_experience: Option<String>,
    pub water_habit: Option<String>,
    pub physical_activity: Option<String>,
    #[serde(default)]
    pub difficulties: Vec<String>,
    pub notification_preference: Option<String>,
    pub weight_kg: Option<f64>,
    pub treatment_status: Option<String>,
}

/// Validated onboarding answers, as stored on the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingAnswers {
    pub main_goal: String,
    pub appetite_level: AppetiteLevel,
    pub protein_frequency: String,
    pub fiber_frequency: String,
    pub energy_level: String,
    pub nausea_experience: String,
    pub water_habit: String,
    pub physical_activity: String,
    pub difficulties: BTreeSet<Difficulty>,
    pub notification_preference: NotificationPreference,
    pub weight_kg: f64,
    pub treatment_status: String,
}

/// User profile stored in the `profiles` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Stable id from the identity provider (also the document ID)
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: String,
    /// Most recent weight (kg)
    pub current_weight_kg: Option<f64>,
    /// Weight given during onboarding (kg)
    pub starting_weight_kg: Option<f64>,
    pub onboarding: Option<OnboardingAnswers>,
    pub targets: NutritionTargets,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile as created at signup.
    pub fn new(
        user_id: impl Into<String>,
        email: Option<String>,
        display_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        Self {
            user_id: user_id.into(),
            email,
            display_name,
            current_weight_kg: None,
            starting_weight_kg: None,
            onboarding: None,
            targets: NutritionTargets::SIGNUP_DEFAULT,
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn appetite_level(&self) -> Option<AppetiteLevel> {
        self.onboarding.as_ref().map(|a| a.appetite_level)
    }

    pub fn has_difficulty(&self, difficulty: Difficulty) -> bool {
        self.onboarding
            .as_ref()
            .is_some_and(|a| a.difficulties.contains(&difficulty))
    }
}
