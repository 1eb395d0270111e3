// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Medication dose events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Doses available on the market, in milligrams.
pub const ALLOWED_DOSES_MG: [f64; 6] = [2.5, 5.0, 7.5, 10.0, 12.5, 15.0];

/// A dose from the fixed set of pen strengths.
///
/// Every allowed value is exactly representable as `f64`, so equality
/// comparison against the set is safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DoseMg(f64);

impl DoseMg {
    pub fn mg(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for DoseMg {
    type Error = InvalidDose;

    fn try_from(mg: f64) -> Result<Self, Self::Error> {
        if ALLOWED_DOSES_MG.contains(&mg) {
            Ok(DoseMg(mg))
        } else {
            Err(InvalidDose(mg))
        }
    }
}

impl From<DoseMg> for f64 {
    fn from(dose: DoseMg) -> f64 {
        dose.0
    }
}

impl fmt::Display for DoseMg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mg", self.0)
    }
}

/// A dose that is not one of `ALLOWED_DOSES_MG`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("dose {0} mg is not one of 2.5, 5, 7.5, 10, 12.5, 15")]
pub struct InvalidDose(pub f64);

/// One administration. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseEvent {
    /// Unique event ID (also used as document ID)
    pub id: String,
    pub user_id: String,
    pub dose_mg: DoseMg,
    pub administered_on: NaiveDate,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
    /// Ordering key, see `time_utils::sort_key`
    pub sort_key: String,
}

impl DoseEvent {
    pub fn new(
        user_id: &str,
        dose_mg: DoseMg,
        administered_on: NaiveDate,
        notes: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            dose_mg,
            administered_on,
            notes,
            recorded_at,
            sort_key: crate::time_utils::sort_key(administered_on, recorded_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_doses() {
        for mg in ALLOWED_DOSES_MG {
            assert_eq!(DoseMg::try_from(mg).unwrap().mg(), mg);
        }
        assert_eq!(DoseMg::try_from(6.0), Err(InvalidDose(6.0)));
        assert!(DoseMg::try_from(f64::NAN).is_err());
        assert!(DoseMg::try_from(0.0).is_err());
    }

    #[test]
    fn test_stored_dose_is_validated_on_read() {
        let err = serde_json::from_str::<DoseMg>("6.0").unwrap_err();
        assert!(err.to_string().contains("6"));

        let dose: DoseMg = serde_json::from_str("12.5").unwrap();
        assert_eq!(dose.to_string(), "12.5 mg");
    }
}
