// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};

/// Calendar date format used on the wire and in document ids.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's calendar date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a `YYYY-MM-DD` calendar date with a four-digit year.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|date| (1..=9999).contains(&date.year()))
}

/// Ordering key for append-only records: calendar date first, then write time.
///
/// For years 1 through 9999 (the range `parse_calendar_date` accepts) both
/// parts are fixed-width, so plain string comparison sorts records
/// chronologically in every store.
pub fn sort_key(date: NaiveDate, recorded_at: DateTime<Utc>) -> String {
    format!(
        "{}#{}",
        date.format(DATE_FORMAT),
        recorded_at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(
            parse_calendar_date("2024-01-08"),
            NaiveDate::from_ymd_opt(2024, 1, 8)
        );
        assert_eq!(parse_calendar_date("08/01/2024"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date("+10000-01-01"), None);
        assert_eq!(parse_calendar_date("0000-01-01"), None);
        assert_eq!(
            parse_calendar_date("9999-12-31"),
            NaiveDate::from_ymd_opt(9999, 12, 31)
        );
    }

    #[test]
    fn test_sort_key_orders_by_date_then_time() {
        let early_write = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let late_write = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();

        // A backfilled January sample written later still sorts before February.
        assert!(sort_key(jan, late_write) < sort_key(feb, early_write));
        assert!(sort_key(jan, early_write) < sort_key(jan, late_write));
    }
}
