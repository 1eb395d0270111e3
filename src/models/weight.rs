// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weight history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One weigh-in. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    /// Unique sample ID (also used as document ID)
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub weight_kg: f64,
    /// Abdominal circumference (cm)
    pub waist_cm: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    /// Ordering key, see `time_utils::sort_key`
    pub sort_key: String,
}

impl WeightSample {
    pub fn new(
        user_id: &str,
        date: NaiveDate,
        weight_kg: f64,
        waist_cm: Option<f64>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            weight_kg,
            waist_cm,
            recorded_at,
            sort_key: crate::time_utils::sort_key(date, recorded_at),
        }
    }
}
