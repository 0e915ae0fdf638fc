//! JSON encoding helpers with canonical forms for domain values.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Number, Value};

/// Serialize a value to a JSON string.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("failed to encode value as json")
}

/// Serialize a value to a pretty-printed JSON string.
pub fn encode_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to encode value as json")
}

/// Canonical JSON form of a calendar date: `YYYY-MM-DD`.
pub fn date_value(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

/// Canonical JSON form of a datetime: RFC 3339.
pub fn datetime_value(moment: DateTime<Utc>) -> Value {
    Value::String(moment.to_rfc3339())
}

/// Canonical JSON form of a decimal: a number when representable, a string
/// otherwise so no precision is silently lost.
pub fn decimal_value(decimal: Decimal) -> Value {
    decimal
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(decimal.to_string()))
}

/// Canonical JSON form of a filesystem path: absolute when resolvable.
pub fn path_value(path: &Path) -> Value {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Value::String(resolved.display().to_string())
}

/// JSON number from a float; non-finite values become null.
pub fn number_value(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// Recursively replace non-encodable leaves with null.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, sanitize(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_date_value_is_iso_formatted() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date_value(date), json!("2024-03-15"));
    }

    #[test]
    fn test_decimal_value_is_numeric() {
        let decimal = Decimal::from_str("19.99").unwrap();
        assert_eq!(decimal_value(decimal), json!(19.99));
    }

    #[test]
    fn test_number_value_replaces_non_finite_with_null() {
        assert_eq!(number_value(2.5), json!(2.5));
        assert_eq!(number_value(f64::NAN), Value::Null);
        assert_eq!(number_value(f64::INFINITY), Value::Null);
    }

    #[test]
    fn test_sanitize_recurses_into_collections() {
        let value = json!({"amounts": [1.5, null], "nested": {"flag": true}});
        assert_eq!(sanitize(value.clone()), value);
    }

    #[test]
    fn test_encode_round_trip() {
        let encoded = encode(&json!({"reference": "o-1"})).unwrap();
        assert_eq!(encoded, r#"{"reference":"o-1"}"#);
    }
}
