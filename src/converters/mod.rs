//! Converters normalize loosely-typed values into domain types.
//!
//! Values arriving from files, spreadsheets and external brokers come in as
//! JSON values of uncertain shape. Each converter carries a default used
//! for null input and an error strategy: `Raise` surfaces conversion
//! failures, `Default` substitutes the configured default instead.

use anyhow::Result;
use serde_json::Value;

pub mod boolean;
pub mod numeric;
pub mod temporal;
pub mod text;

pub use boolean::{to_boolean, BooleanConverter};
pub use numeric::{DecimalConverter, FloatConverter, IntegerConverter};
pub use temporal::{DateConverter, DateTimeConverter, TimestampConverter};
pub use text::{
    from_yes_or_no, to_yes_or_no, CurrencyConverter, DistanceConverter, StringConverter,
};

/// Strategy applied when a value cannot be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnError {
    /// Surface the conversion failure.
    #[default]
    Raise,
    /// Substitute the configured default.
    Default,
}

/// Conversion from a JSON value to a typed one.
pub trait Converter {
    type Output: Clone;

    /// Convert a non-null value; failures surface here.
    fn convert_value(&self, value: &Value) -> Result<Self::Output>;

    /// Value substituted for null input and, when lenient, for failures.
    fn default_value(&self) -> Self::Output;

    /// Strategy applied when conversion fails.
    fn on_error(&self) -> OnError;

    /// Convert a value, applying the default and error strategy.
    fn convert(&self, value: &Value) -> Result<Self::Output> {
        if value.is_null() {
            return Ok(self.default_value());
        }
        match self.convert_value(value) {
            Ok(converted) => Ok(converted),
            Err(failure) => match self.on_error() {
                OnError::Raise => Err(failure),
                OnError::Default => Ok(self.default_value()),
            },
        }
    }
}
