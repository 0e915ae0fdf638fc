//! Conversion of values to booleans.

use anyhow::Result;
use serde_json::Value;

use super::{Converter, OnError};
use crate::errors::Error;

pub(crate) const TRUTHY_VALUES: [&str; 4] = ["true", "yes", "y", "1"];
pub(crate) const FALSY_VALUES: [&str; 4] = ["false", "no", "n", "0"];

/// Converts values to booleans.
///
/// Strings are matched case-insensitively against the truthy and falsy
/// vocabularies; numbers are truthy when non-zero.
pub struct BooleanConverter {
    default: bool,
    on_error: OnError,
}

impl BooleanConverter {
    pub fn new() -> Self {
        Self {
            default: false,
            on_error: OnError::Raise,
        }
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Substitute the default instead of raising on failures.
    pub fn lenient(mut self) -> Self {
        self.on_error = OnError::Default;
        self
    }
}

impl Default for BooleanConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for BooleanConverter {
    type Output = bool;

    fn convert_value(&self, value: &Value) -> Result<bool> {
        match value {
            Value::Bool(flag) => Ok(*flag),
            Value::Number(number) => Ok(number.as_f64().unwrap_or_default() != 0.0),
            Value::String(text) => {
                let lowered = text.trim().to_lowercase();
                if lowered.is_empty() {
                    return Ok(self.default);
                }
                if TRUTHY_VALUES.contains(&lowered.as_str()) {
                    return Ok(true);
                }
                if FALSY_VALUES.contains(&lowered.as_str()) {
                    return Ok(false);
                }
                Err(Error::Conversion {
                    expected: "bool",
                    value: text.clone(),
                }
                .into())
            }
            other => Err(Error::Conversion {
                expected: "bool",
                value: other.to_string(),
            }
            .into()),
        }
    }

    fn default_value(&self) -> bool {
        self.default
    }

    fn on_error(&self) -> OnError {
        self.on_error
    }
}

/// Convert a value to a boolean with the default configuration.
pub fn to_boolean(value: &Value) -> Result<bool> {
    BooleanConverter::new().convert(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_booleans() {
        assert!(to_boolean(&json!(true)).unwrap());
        assert!(!to_boolean(&json!(false)).unwrap());
    }

    #[test]
    fn test_converts_truthy_and_falsy_strings() {
        assert!(to_boolean(&json!("Yes")).unwrap());
        assert!(to_boolean(&json!("y")).unwrap());
        assert!(to_boolean(&json!("TRUE")).unwrap());
        assert!(!to_boolean(&json!("no")).unwrap());
        assert!(!to_boolean(&json!("0")).unwrap());
    }

    #[test]
    fn test_converts_numbers() {
        assert!(to_boolean(&json!(1)).unwrap());
        assert!(to_boolean(&json!(-2.5)).unwrap());
        assert!(!to_boolean(&json!(0)).unwrap());
    }

    #[test]
    fn test_null_uses_default() {
        assert!(!to_boolean(&Value::Null).unwrap());
        let converter = BooleanConverter::new().with_default(true);
        assert!(converter.convert(&Value::Null).unwrap());
    }

    #[test]
    fn test_unrecognized_string_is_an_error() {
        assert!(to_boolean(&json!("maybe")).is_err());
    }

    #[test]
    fn test_lenient_converter_falls_back_to_default() {
        let converter = BooleanConverter::new().with_default(true).lenient();
        assert!(converter.convert(&json!("maybe")).unwrap());
    }
}
