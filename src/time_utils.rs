// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.
//!
//! Workout dates are stored as strings. Everything that orders or buckets
//! them goes through [`parse_timestamp`], so a record with a garbled date is
//! skipped by the derivations instead of failing them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 with millisecond precision and a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored workout date.
///
/// Accepts RFC3339 with any offset, a naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (read as UTC) and a bare calendar day (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    parse_day(raw).map(|day| day.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a bare `YYYY-MM-DD` calendar day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Resolve the date submitted for a session into a stored timestamp.
///
/// A full timestamp is normalized to UTC. A bare calendar day keeps the
/// time of day of `time_source` (now for new sessions, the original time for
/// edits). Returns `None` when the input is neither.
pub fn resolve_session_date(input: &str, time_source: DateTime<Utc>) -> Option<String> {
    if let Some(day) = parse_day(input) {
        let combined = day.and_time(time_source.time()).and_utc();
        return Some(format_utc_rfc3339(combined));
    }
    parse_timestamp(input).map(format_utc_rfc3339)
}

/// Short chart label (`"Jan 8"`), always rendered in UTC.
pub fn chart_label(date: DateTime<Utc>) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_timestamp("2024-01-08T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 8, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_bare_day_as_utc_midnight() {
        let parsed = parse_timestamp("2023-10-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 10, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_datetime_with_fraction() {
        let parsed = parse_timestamp("2024-03-05T06:07:08.250").unwrap();
        assert_eq!(parsed.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn bare_day_keeps_time_of_day() {
        let source = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 15).unwrap();
        let resolved = resolve_session_date("2024-06-02", source).unwrap();
        assert_eq!(resolved, "2024-06-02T18:30:15.000Z");
    }

    #[test]
    fn full_timestamp_is_normalized() {
        let source = Utc::now();
        let resolved = resolve_session_date("2024-01-08T10:00:00Z", source).unwrap();
        assert_eq!(resolved, "2024-01-08T10:00:00.000Z");
        assert!(resolve_session_date("yesterday", source).is_none());
    }

    #[test]
    fn chart_label_uses_utc_day() {
        // 23:30 at -05:00 is already the next day in UTC.
        let date = parse_timestamp("2024-01-07T23:30:00-05:00").unwrap();
        assert_eq!(chart_label(date), "Jan 8");
    }
}
