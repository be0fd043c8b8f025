//! Scalar coercion: raw JSON scalars to model values.

use crate::registry::ValueType;
use actstream_model::{Value, Verb};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;

/// Converts a raw JSON scalar into a model value.
///
/// With a declared type the type's parser decides (and may refuse); without
/// one the default mapping applies. `null` never reaches a declared type.
pub fn coerce(raw: &JsonValue, declared: Option<&ValueType>) -> Result<Value, String> {
    if raw.is_null() {
        return Ok(Value::Null);
    }
    match declared {
        Some(ValueType::DateTime) => parse_datetime(raw).map(Value::DateTime),
        Some(ValueType::Verb) => parse_verb(raw).map(Value::Verb),
        Some(ValueType::Scalar(scalar)) => scalar.parse(raw),
        Some(ValueType::Kind(_)) | None => Ok(default_scalar(raw)),
    }
}

/// The untyped mapping: booleans, numbers (integral or float as received)
/// and strings map to themselves.
pub fn default_scalar(raw: &JsonValue) -> Value {
    match raw {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => Value::Number(n.clone()),
        JsonValue::String(s) => Value::String(s.clone()),
        // Containers are handled by the decoder; keep them opaque if one
        // slips through.
        other => Value::typed("json", other.clone()),
    }
}

fn parse_verb(raw: &JsonValue) -> Result<Verb, String> {
    let token = raw
        .as_str()
        .ok_or_else(|| format!("expected a verb token, found {}", json_kind(raw)))?;
    token.parse().map_err(|e: actstream_model::Error| e.to_string())
}

/// Parses RFC 3339 first, then the looser ISO 8601 forms seen in the wild:
/// a local date-time without offset, or a bare date. Both are read as UTC.
pub fn parse_datetime(raw: &JsonValue) -> Result<DateTime<FixedOffset>, String> {
    let text = raw
        .as_str()
        .ok_or_else(|| format!("expected an ISO 8601 string, found {}", json_kind(raw)))?
        .trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc().fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    Err(format!("{text:?} is not an ISO 8601 timestamp"))
}

pub(crate) fn json_kind(raw: &JsonValue) -> &'static str {
    match raw {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
