//! Wire/domain types for the central-ledger admin API.
//!
//! All types serialize with the camelCase field names the ledger speaks.
//! Unset optional fields encode as explicit JSON `null` and decode back to
//! unset, so a round trip never invents or loses a field.

pub mod action;
pub mod participant;
pub mod transfer;

pub use action::Action;
pub use participant::{Account, Links, Participant};
pub use transfer::{Amount, Extension, Transfer};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Millisecond-precision UTC timestamps, e.g. `2022-01-17T12:12:18.425Z`.
pub(crate) mod datetime_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

/// The ledger is loose about id types: numbers and strings both occur.
pub(crate) fn de_opt_string_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    })
}

/// Active flags arrive as 0/1 from some endpoints and as booleans from others.
pub(crate) fn de_bool_from_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) > 0,
        _ => false,
    })
}
