//! ISO-8601 timestamp reading shared by stored entries and deletion cutoffs.
//!
//! Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC, or a bare
//! `YYYY-MM-DD` meaning midnight UTC. Timestamps are always written back as
//! RFC 3339.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// `deserialize_with` target for stored timestamps.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_iso8601(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp '{raw}'")))
}
