//! Free-form number parsing.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::Error;

static NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.\-]").expect("pattern is valid"));

/// Extract a number from free-form text, e.g. `"1,234.56 kg"` → `1234.56`.
pub fn parse_number(value: &str) -> Result<f64> {
    let cleaned = NOISE.replace_all(value.trim(), "");
    cleaned.parse::<f64>().map_err(|_| {
        Error::Conversion {
            expected: "number",
            value: value.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_numbers() {
        assert_eq!(parse_number("42").unwrap(), 42.0);
        assert_eq!(parse_number("-3.5").unwrap(), -3.5);
    }

    #[test]
    fn test_strips_separators_and_units() {
        assert_eq!(parse_number("1,234.56 kg").unwrap(), 1234.56);
        assert_eq!(parse_number("$ 99").unwrap(), 99.0);
    }

    #[test]
    fn test_errors_without_a_number() {
        assert!(parse_number("kilograms").is_err());
        assert!(parse_number("").is_err());
    }
}
