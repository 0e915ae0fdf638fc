//! Conversion of values to integers, floats and decimals.

use std::str::FromStr;

use anyhow::Result;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{Converter, OnError};
use crate::errors::Error;
use crate::parsers::parse_number;

/// Converts values to 64-bit integers. Fractions truncate toward zero.
pub struct IntegerConverter {
    default: i64,
    on_error: OnError,
}

impl IntegerConverter {
    pub fn new() -> Self {
        Self {
            default: 0,
            on_error: OnError::Raise,
        }
    }

    pub fn with_default(mut self, default: i64) -> Self {
        self.default = default;
        self
    }

    pub fn lenient(mut self) -> Self {
        self.on_error = OnError::Default;
        self
    }
}

impl Default for IntegerConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for IntegerConverter {
    type Output = i64;

    fn convert_value(&self, value: &Value) -> Result<i64> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|float| float.trunc() as i64))
                .ok_or_else(|| {
                    Error::Conversion {
                        expected: "integer",
                        value: number.to_string(),
                    }
                    .into()
                }),
            Value::Bool(flag) => Ok(i64::from(*flag)),
            Value::String(text) => match text.trim().parse::<i64>() {
                Ok(parsed) => Ok(parsed),
                Err(_) => Ok(parse_number(text)?.trunc() as i64),
            },
            other => Err(Error::Conversion {
                expected: "integer",
                value: other.to_string(),
            }
            .into()),
        }
    }

    fn default_value(&self) -> i64 {
        self.default
    }

    fn on_error(&self) -> OnError {
        self.on_error
    }
}

/// Converts values to 64-bit floats.
pub struct FloatConverter {
    default: f64,
    on_error: OnError,
}

impl FloatConverter {
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

impl Default for FloatConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for FloatConverter {
    type Output = f64;

    fn convert_value(&self, value: &Value) -> Result<f64> {
        match value {
            Value::Number(number) => number.as_f64().ok_or_else(|| {
                Error::Conversion {
                    expected: "float",
                    value: number.to_string(),
                }
                .into()
            }),
            Value::Bool(flag) => Ok(f64::from(u8::from(*flag))),
            Value::String(text) => match text.trim().parse::<f64>() {
                Ok(parsed) => Ok(parsed),
                Err(_) => parse_number(text),
            },
            other => Err(Error::Conversion {
                expected: "float",
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

/// Converts values to fixed-point decimals, for amounts where binary
/// floating point would drift.
pub struct DecimalConverter {
    default: Decimal,
    on_error: OnError,
}

impl DecimalConverter {
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

impl Default for DecimalConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DecimalConverter {
    type Output = Decimal;

    fn convert_value(&self, value: &Value) -> Result<Decimal> {
        match value {
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    return Ok(Decimal::from(integer));
                }
                number
                    .as_f64()
                    .and_then(Decimal::from_f64)
                    .ok_or_else(|| {
                        Error::Conversion {
                            expected: "decimal",
                            value: number.to_string(),
                        }
                        .into()
                    })
            }
            Value::String(text) => Decimal::from_str(text.trim()).map_err(|_| {
                Error::Conversion {
                    expected: "decimal",
                    value: text.clone(),
                }
                .into()
            }),
            other => Err(Error::Conversion {
                expected: "decimal",
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_integers() {
        let converter = IntegerConverter::new();
        assert_eq!(converter.convert(&json!(42)).unwrap(), 42);
        assert_eq!(converter.convert(&json!(4.9)).unwrap(), 4);
        assert_eq!(converter.convert(&json!("17")).unwrap(), 17);
        assert_eq!(converter.convert(&json!("1,250")).unwrap(), 1250);
        assert_eq!(converter.convert(&json!(true)).unwrap(), 1);
    }

    #[test]
    fn test_integer_null_uses_default() {
        let converter = IntegerConverter::new().with_default(-1);
        assert_eq!(converter.convert(&Value::Null).unwrap(), -1);
    }

    #[test]
    fn test_converts_floats() {
        let converter = FloatConverter::new();
        assert_eq!(converter.convert(&json!(2.5)).unwrap(), 2.5);
        assert_eq!(converter.convert(&json!("3.25")).unwrap(), 3.25);
        assert_eq!(converter.convert(&json!("1,000.5")).unwrap(), 1000.5);
    }

    #[test]
    fn test_float_conversion_failure_raises() {
        let converter = FloatConverter::new();
        assert!(converter.convert(&json!("not a number")).is_err());
    }

    #[test]
    fn test_lenient_float_falls_back() {
        let converter = FloatConverter::new().with_default(9.9).lenient();
        assert_eq!(converter.convert(&json!("not a number")).unwrap(), 9.9);
    }

    #[test]
    fn test_converts_decimals() {
        let converter = DecimalConverter::new();
        assert_eq!(
            converter.convert(&json!("19.99")).unwrap(),
            Decimal::from_str("19.99").unwrap()
        );
        assert_eq!(converter.convert(&json!(5)).unwrap(), Decimal::from(5));
    }
}
