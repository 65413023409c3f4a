use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an action record. Also used as the polling cursor.
pub type ActionId = i64;

/// An event reported by the monitored server. Read-only on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    #[serde(default)]
    pub timestamp: RecordTimestamp,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Either epoch seconds or a SQL-style `YYYY-MM-DD HH:MM:SS` string in UTC.
/// Anything else (null, objects, a missing field) lands in `Invalid` so a
/// single odd record still renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordTimestamp {
    Epoch(f64),
    Text(String),
    Invalid(serde_json::Value),
}

impl Default for RecordTimestamp {
    fn default() -> Self {
        RecordTimestamp::Invalid(serde_json::Value::Null)
    }
}

pub const INVALID_DATE: &str = "Invalid Date";

const SQL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl RecordTimestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            RecordTimestamp::Epoch(secs) => {
                if !secs.is_finite() {
                    return None;
                }
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
                DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
            }
            RecordTimestamp::Text(text) => {
                NaiveDateTime::parse_from_str(text.trim(), SQL_TIMESTAMP_FORMAT)
                    .ok()
                    .map(|naive| naive.and_utc())
            }
            RecordTimestamp::Invalid(_) => None,
        }
    }

    /// Display string in the local time zone.
    pub fn display(&self) -> String {
        self.display_in(&Local)
    }

    /// Unparseable text is shown as-is; non-time values as `Invalid Date`.
    pub fn display_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match self.to_utc() {
            Some(utc) => utc.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
            None => match self {
                RecordTimestamp::Epoch(secs) => secs.to_string(),
                RecordTimestamp::Text(text) => text.clone(),
                RecordTimestamp::Invalid(_) => INVALID_DATE.to_string(),
            },
        }
    }
}
