//! Conversion of values to strings and string-encoded quantities.

use std::str::FromStr;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use super::boolean::{FALSY_VALUES, TRUTHY_VALUES};
use super::{Converter, OnError};
use crate::errors::Error;
use crate::parsers::parse_number;

/// Converts scalar values to their canonical string form.
pub struct StringConverter {
    default: String,
    on_error: OnError,
}

impl StringConverter {
    pub fn new() -> Self {
        Self {
            default: String::new(),
            on_error: OnError::Raise,
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }

    pub fn lenient(mut self) -> Self {
        self.on_error = OnError::Default;
        self
    }
}

impl Default for StringConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for StringConverter {
    type Output = String;

    fn convert_value(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(text) => Ok(text.clone()),
            Value::Number(number) => Ok(number.to_string()),
            Value::Bool(flag) => Ok(flag.to_string()),
            other => Err(Error::Conversion {
                expected: "string",
                value: other.to_string(),
            }
            .into()),
        }
    }

    fn default_value(&self) -> String {
        self.default.clone()
    }

    fn on_error(&self) -> OnError {
        self.on_error
    }
}

static CURRENCY_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.\-]").expect("currency pattern is valid"));

/// Converts currency amounts to decimals.
///
/// Symbols and thousands separators are stripped; a parenthesized amount is
/// negative, per accounting convention.
pub struct CurrencyConverter {
    default: Decimal,
    on_error: OnError,
}

impl CurrencyConverter {
    pub fn new() -> Self {
        Self {
            default: Decimal::ZERO,
            on_error: OnError::Raise,
        }
    }

    pub fn with_default(mut self, default: Decimal) -> Self {
        self.default = default;
        self
    }

    pub fn lenient(mut self) -> Self {
        self.on_error = OnError::Default;
        self
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for CurrencyConverter {
    type Output = Decimal;

    fn convert_value(&self, value: &Value) -> Result<Decimal> {
        match value {
            Value::String(text) => {
                let trimmed = text.trim();
                let negative = trimmed.starts_with('(') && trimmed.ends_with(')');
                let cleaned = CURRENCY_NOISE.replace_all(trimmed, "");
                let amount = Decimal::from_str(&cleaned).map_err(|_| Error::Conversion {
                    expected: "currency",
                    value: text.clone(),
                })?;
                Ok(if negative { -amount } else { amount })
            }
            Value::Number(number) => decimal_from_number(number).ok_or_else(|| {
                Error::Conversion {
                    expected: "currency",
                    value: number.to_string(),
                }
                .into()
            }),
            other => Err(Error::Conversion {
                expected: "currency",
                value: other.to_string(),
            }
            .into()),
        }
    }

    fn default_value(&self) -> Decimal {
        self.default
    }

    fn on_error(&self) -> OnError {
        self.on_error
    }
}

fn decimal_from_number(number: &serde_json::Number) -> Option<Decimal> {
    use rust_decimal::prelude::FromPrimitive;
    number
        .as_i64()
        .map(Decimal::from)
        .or_else(|| number.as_f64().and_then(Decimal::from_f64))
}

static DISTANCE_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(km|mi|mm|cm|m|ft|in|yd)\.?\s*$").expect("unit pattern is valid"));

/// Converts distances to floats, stripping a trailing unit suffix.
pub struct DistanceConverter {
    default: f64,
    on_error: OnError,
}

impl DistanceConverter {
    pub fn new() -> Self {
        Self {
            default: 0.0,
            on_error: OnError::Raise,
        }
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }

    pub fn lenient(mut self) -> Self {
        self.on_error = OnError::Default;
        self
    }
}

impl Default for DistanceConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DistanceConverter {
    type Output = f64;

    fn convert_value(&self, value: &Value) -> Result<f64> {
        match value {
            Value::Number(number) => number.as_f64().ok_or_else(|| {
                Error::Conversion {
                    expected: "distance",
                    value: number.to_string(),
                }
                .into()
            }),
            Value::String(text) => {
                let stripped = DISTANCE_UNIT.replace(text.trim(), "");
                parse_number(&stripped)
            }
            other => Err(Error::Conversion {
                expected: "distance",
                value: other.to_string(),
            }
            .into()),
        }
    }

    fn default_value(&self) -> f64 {
        self.default
    }

    fn on_error(&self) -> OnError {
        self.on_error
    }
}

/// Convert a value to a `"Y"` / `"N"` flag.
pub fn to_yes_or_no(value: &Value) -> Result<&'static str> {
    match value {
        Value::Bool(flag) => Ok(if *flag { "Y" } else { "N" }),
        Value::Number(number) => Ok(if number.as_f64().unwrap_or_default() != 0.0 {
            "Y"
        } else {
            "N"
        }),
        Value::String(text) => {
            let lowered = text.trim().to_lowercase();
            if TRUTHY_VALUES.contains(&lowered.as_str()) {
                Ok("Y")
            } else if FALSY_VALUES.contains(&lowered.as_str()) {
                Ok("N")
            } else {
                Err(Error::Conversion {
                    expected: "yes-or-no",
                    value: text.clone(),
                }
                .into())
            }
        }
        other => Err(Error::Conversion {
            expected: "yes-or-no",
            value: other.to_string(),
        }
        .into()),
    }
}

/// Parse a `"Y"` / `"N"` style flag back into a boolean.
pub fn from_yes_or_no(flag: &str) -> Result<bool> {
    match flag.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(Error::Conversion {
            expected: "bool",
            value: other.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_scalars_to_strings() {
        let converter = StringConverter::new();
        assert_eq!(converter.convert(&json!("text")).unwrap(), "text");
        assert_eq!(converter.convert(&json!(42)).unwrap(), "42");
        assert_eq!(converter.convert(&json!(true)).unwrap(), "true");
    }

    #[test]
    fn test_converts_currency_strings() {
        let converter = CurrencyConverter::new();
        assert_eq!(
            converter.convert(&json!("$1,234.56")).unwrap(),
            Decimal::from_str("1234.56").unwrap()
        );
        assert_eq!(
            converter.convert(&json!("(500.00)")).unwrap(),
            Decimal::from_str("-500.00").unwrap()
        );
    }

    #[test]
    fn test_converts_distance_strings() {
        let converter = DistanceConverter::new();
        assert_eq!(converter.convert(&json!("12.5 km")).unwrap(), 12.5);
        assert_eq!(converter.convert(&json!("3 mi")).unwrap(), 3.0);
        assert_eq!(converter.convert(&json!(7.25)).unwrap(), 7.25);
    }

    #[test]
    fn test_yes_or_no_round_trip() {
        assert_eq!(to_yes_or_no(&json!(true)).unwrap(), "Y");
        assert_eq!(to_yes_or_no(&json!("no")).unwrap(), "N");
        assert!(from_yes_or_no("Y").unwrap());
        assert!(!from_yes_or_no("n").unwrap());
        assert!(from_yes_or_no("perhaps").is_err());
    }
}
