//! Lenient date decoding for submitted payloads
//!
//! Dates arrive as RFC 3339 timestamps, calendar dates (`2024-01-01`, read as
//! midnight UTC) or millisecond epoch numbers. They are always written back
//! as RFC 3339.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` calendar date.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

fn decode(value: Value, allow_date_node: bool) -> Result<DateTime<Utc>, String> {
    match value {
        Value::String(text) => parse_date(&text).ok_or_else(|| format!("invalid date `{}`", text)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
            .ok_or_else(|| format!("invalid timestamp {}", n)),
        Value::Object(mut node) if allow_date_node => {
            let tagged = match node.get("type") {
                None => true,
                Some(Value::String(tag)) => tag == "Date",
                Some(_) => false,
            };
            if !tagged {
                return Err("date object must have type `Date`".into());
            }
            match node.remove("value") {
                Some(value) => decode(value, false),
                None => Err("missing field `value`".into()),
            }
        }
        Value::Object(_) => Err("invalid type: map, expected a date".into()),
        other => Err(format!("invalid type: {}, expected a date", other)),
    }
}

/// `deserialize_with` target for required dates.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    decode(Value::deserialize(deserializer)?, false).map_err(D::Error::custom)
}

/// `deserialize_with` target for optional or nullable dates.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => decode(value, false).map(Some).map_err(D::Error::custom),
    }
}

/// Like [`deserialize_option`], also accepting a `{ "type": "Date", "value" }`
/// node as reference metadata carries it.
pub fn deserialize_date_node_option<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => decode(value, true).map(Some).map_err(D::Error::custom),
    }
}
