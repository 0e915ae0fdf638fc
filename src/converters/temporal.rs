//! Conversion of values to dates, datetimes and timestamps.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use super::{Converter, OnError};
use crate::errors::Error;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    parse_datetime(trimmed).map(|moment| moment.date_naive())
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(moment) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(moment.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Converts values to calendar dates.
///
/// Strings are tried against common date formats, then as datetimes whose
/// date part is kept.
pub struct DateConverter {
    default: Option<NaiveDate>,
    on_error: OnError,
}

impl DateConverter {
    pub fn new() -> Self {
        Self {
            default: None,
            on_error: OnError::Raise,
        }
    }

    pub fn with_default(mut self, default: NaiveDate) -> Self {
        self.default = Some(default);
        self
    }

    pub fn lenient(mut self) -> Self {
        self.on_error = OnError::Default;
        self
    }
}

impl Default for DateConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DateConverter {
    type Output = Option<NaiveDate>;

    fn convert_value(&self, value: &Value) -> Result<Option<NaiveDate>> {
        match value {
            Value::String(text) => parse_date(text).map(Some).ok_or_else(|| {
                Error::Conversion {
                    expected: "date",
                    value: text.clone(),
                }
                .into()
            }),
            Value::Number(number) => {
                let timestamp = number.as_i64().ok_or(Error::Conversion {
                    expected: "date",
                    value: number.to_string(),
                })?;
                let moment = Utc
                    .timestamp_opt(timestamp, 0)
                    .single()
                    .ok_or(Error::Conversion {
                        expected: "date",
                        value: number.to_string(),
                    })?;
                Ok(Some(moment.date_naive()))
            }
            other => Err(Error::Conversion {
                expected: "date",
                value: other.to_string(),
            }
            .into()),
        }
    }

    fn default_value(&self) -> Option<NaiveDate> {
        self.default
    }

    fn on_error(&self) -> OnError {
        self.on_error
    }
}

/// Converts values to UTC datetimes.
///
/// Naive datetime strings are assumed UTC; date-only strings become
/// midnight; numbers are unix timestamps in seconds.
pub struct DateTimeConverter {
    default: Option<DateTime<Utc>>,
    on_error: OnError,
}

impl DateTimeConverter {
    pub fn new() -> Self {
        Self {
            default: None,
            on_error: OnError::Raise,
        }
    }

    pub fn with_default(mut self, default: DateTime<Utc>) -> Self {
        self.default = Some(default);
        self
    }

    pub fn lenient(mut self) -> Self {
        self.on_error = OnError::Default;
        self
    }
}

impl Default for DateTimeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for DateTimeConverter {
    type Output = Option<DateTime<Utc>>;

    fn convert_value(&self, value: &Value) -> Result<Option<DateTime<Utc>>> {
        match value {
            Value::String(text) => {
                if let Some(moment) = parse_datetime(text) {
                    return Ok(Some(moment));
                }
                if let Some(date) = parse_date(text) {
                    let midnight = date.and_hms_opt(0, 0, 0).ok_or(Error::Conversion {
                        expected: "datetime",
                        value: text.clone(),
                    })?;
                    return Ok(Some(Utc.from_utc_datetime(&midnight)));
                }
                Err(Error::Conversion {
                    expected: "datetime",
                    value: text.clone(),
                }
                .into())
            }
            Value::Number(number) => {
                let seconds = number.as_f64().ok_or(Error::Conversion {
                    expected: "datetime",
                    value: number.to_string(),
                })?;
                let moment = Utc
                    .timestamp_opt(seconds.trunc() as i64, (seconds.fract() * 1e9) as u32)
                    .single()
                    .ok_or(Error::Conversion {
                        expected: "datetime",
                        value: number.to_string(),
                    })?;
                Ok(Some(moment))
            }
            other => Err(Error::Conversion {
                expected: "datetime",
                value: other.to_string(),
            }
            .into()),
        }
    }

    fn default_value(&self) -> Option<DateTime<Utc>> {
        self.default
    }

    fn on_error(&self) -> OnError {
        self.on_error
    }
}

/// Converts values to unix timestamps in seconds.
pub struct TimestampConverter {
    default: i64,
    on_error: OnError,
}

impl TimestampConverter {
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

impl Default for TimestampConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for TimestampConverter {
    type Output = i64;

    fn convert_value(&self, value: &Value) -> Result<i64> {
        match value {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|seconds| seconds.trunc() as i64))
                .ok_or_else(|| {
                    Error::Conversion {
                        expected: "timestamp",
                        value: number.to_string(),
                    }
                    .into()
                }),
            Value::String(text) => {
                if let Ok(parsed) = text.trim().parse::<i64>() {
                    return Ok(parsed);
                }
                parse_datetime(text)
                    .map(|moment| moment.timestamp())
                    .ok_or_else(|| {
                        Error::Conversion {
                            expected: "timestamp",
                            value: text.clone(),
                        }
                        .into()
                    })
            }
            other => Err(Error::Conversion {
                expected: "timestamp",
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
