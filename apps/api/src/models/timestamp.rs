//! Timestamps as they appear in stored documents.
//!
//! Documents written by different clients carry `createdAt` in one of three
//! shapes. Each is a variant of [`StoredTimestamp`]; [`to_millis`] collapses them
//! into milliseconds since the Unix epoch so they can be compared.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum StoredTimestamp {
    /// Native date value, stored as `{"$date": "<rfc3339>"}`.
    Date(DateTime<Utc>),
    /// Store timestamp object that converts to a date: `{"seconds", "nanoseconds"}`.
    Timestamp { seconds: i64, nanoseconds: u32 },
    /// ISO-8601 text, parsed only when normalized.
    Iso(String),
}

impl StoredTimestamp {
    /// Milliseconds since the epoch, or 0 if the value cannot be interpreted.
    pub fn to_millis(&self) -> i64 {
        match self {
            StoredTimestamp::Date(dt) => dt.timestamp_millis(),
            StoredTimestamp::Timestamp {
                seconds,
                nanoseconds,
            } => seconds
                .saturating_mul(1000)
                .saturating_add(i64::from(*nanoseconds / 1_000_000)),
            StoredTimestamp::Iso(text) => parse_iso_millis(text).unwrap_or(0),
        }
    }

    /// Classifies a raw JSON value. Unrecognized shapes yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(StoredTimestamp::Iso(text.clone())),
            Value::Object(map) => {
                if let Some(date) = map.get("$date") {
                    return date
                        .as_str()
                        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                        .map(|dt| StoredTimestamp::Date(dt.with_timezone(&Utc)));
                }
                let seconds = map
                    .get("seconds")
                    .or_else(|| map.get("_seconds"))
                    .and_then(Value::as_i64)?;
                let nanoseconds = map
                    .get("nanoseconds")
                    .or_else(|| map.get("_nanoseconds"))
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                Some(StoredTimestamp::Timestamp {
                    seconds,
                    nanoseconds: u32::try_from(nanoseconds).ok()?,
                })
            }
            _ => None,
        }
    }
}

/// Normalizes an optional timestamp; absent values sort as 0.
pub fn to_millis(value: Option<&StoredTimestamp>) -> i64 {
    value.map(StoredTimestamp::to_millis).unwrap_or(0)
}

/// Accepts RFC 3339, RFC 2822 (`Date#toUTCString` output), offset-less
/// date-times (read as UTC), bare dates and the reduced forms `YYYY-MM` / `YYYY`.
fn parse_iso_millis(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let date_text = match text.split_once('-') {
        None if text.len() == 4 && is_digits(text) => format!("{text}-01-01"),
        Some((year, month))
            if year.len() == 4 && month.len() == 2 && is_digits(year) && is_digits(month) =>
        {
            format!("{text}-01")
        }
        _ => text.to_string(),
    };
    NaiveDate::parse_from_str(&date_text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}
