//! Calendar-date parsing shared by request payloads and stored rows.
//!
//! Dates arrive either as plain `YYYY-MM-DD` strings or as full RFC 3339
//! timestamps (older clients sent `Date#toISOString()` output). Both are
//! normalized to a [`NaiveDate`]; the time-of-day component is dropped.

use chrono::{DateTime, NaiveDate};
use serde::{de::Error as _, Deserialize, Deserializer};

pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())
}

/// `deserialize_with` helper for a required date field.
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
}

/// `deserialize_with` helper for an optional date field. Pair with
/// `#[serde(default)]` so a missing field becomes `None`.
pub fn deserialize_opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_calendar_date(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {raw}"))),
        None => Ok(None),
    }
}

/// `deserialize_with` helper for an optional list of dates.
pub fn deserialize_opt_dates<'de, D>(deserializer: D) -> Result<Option<Vec<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Vec<String>>::deserialize(deserializer)? {
        Some(raw) => raw
            .iter()
            .map(|d| {
                parse_calendar_date(d).ok_or_else(|| D::Error::custom(format!("invalid date: {d}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        None => Ok(None),
    }
}
