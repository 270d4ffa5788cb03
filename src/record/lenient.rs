//! Tolerant deserializers for record fields.
//!
//! Snapshots come from whatever the upstream fetch produced, so a bad date
//! or a `null` list must degrade to "missing" instead of failing the load.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Text(String),
    Millis(i64),
    Other(IgnoredAny),
}

/// Parse an instant from RFC 3339, `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Optional instant; unparseable values become `None`.
pub fn instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawInstant>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawInstant::Text(text)) => {
            let parsed = parse_instant(&text);
            if parsed.is_none() && !text.trim().is_empty() {
                warn!(value = %text, "unparseable date field, treating as missing");
            }
            parsed
        }
        Some(RawInstant::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Some(RawInstant::Other(_)) => {
            warn!("non-date value in date field, treating as missing");
            None
        }
    })
}

/// String list where `null` means empty.
pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
