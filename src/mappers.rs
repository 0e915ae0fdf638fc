//! Schema-driven record mapping between external and internal shapes.
//!
//! A mapper translates records arriving from files or brokers ("outward"
//! shape) into the names and types the domain expects ("inward" shape), and
//! back. Fields may rename, supply a default for absent values and run a
//! direction-specific converter.

use anyhow::Result;
use serde_json::{Map, Value};

use crate::errors::Error;

/// Conversion applied to a single field value.
pub type FieldConverter = Box<dyn Fn(&Value) -> Result<Value>>;

/// One field of a mapping schema.
pub struct Field {
    outward: String,
    inward: String,
    default: Value,
    inward_converter: Option<FieldConverter>,
    outward_converter: Option<FieldConverter>,
}

impl Field {
    /// Map the external key `outward` to the internal key `inward`.
    pub fn new(outward: &str, inward: &str) -> Self {
        Self {
            outward: outward.to_string(),
            inward: inward.to_string(),
            default: Value::Null,
            inward_converter: None,
            outward_converter: None,
        }
    }

    /// Value used when the source record lacks the field.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    /// Converter applied when mapping outward → inward.
    pub fn inward_with(mut self, converter: impl Fn(&Value) -> Result<Value> + 'static) -> Self {
        self.inward_converter = Some(Box::new(converter));
        self
    }

    /// Converter applied when mapping inward → outward.
    pub fn outward_with(mut self, converter: impl Fn(&Value) -> Result<Value> + 'static) -> Self {
        self.outward_converter = Some(Box::new(converter));
        self
    }
}

/// Maps whole records through a field schema.
pub struct RecordMapper {
    fields: Vec<Field>,
}

impl RecordMapper {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> usize {
        self.fields.len()
    }

    /// External record → internal record.
    pub fn from_record(&self, record: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut result = Map::new();
        for field in &self.fields {
            let value = match record.get(&field.outward) {
                Some(value) => match &field.inward_converter {
                    Some(converter) => converter(value)?,
                    None => value.clone(),
                },
                None => field.default.clone(),
            };
            result.insert(field.inward.clone(), value);
        }
        Ok(result)
    }

    /// Internal record → external record.
    pub fn to_record(&self, record: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut result = Map::new();
        for field in &self.fields {
            let value = match record.get(&field.inward) {
                Some(value) => match &field.outward_converter {
                    Some(converter) => converter(value)?,
                    None => value.clone(),
                },
                None => field.default.clone(),
            };
            result.insert(field.outward.clone(), value);
        }
        Ok(result)
    }

    /// Positional row → internal record, fields in declaration order.
    pub fn from_row(&self, row: &[Value]) -> Result<Map<String, Value>> {
        let mut result = Map::new();
        for (index, field) in self.fields.iter().enumerate() {
            let value = match row.get(index) {
                Some(value) => match &field.inward_converter {
                    Some(converter) => converter(value)?,
                    None => value.clone(),
                },
                None => field.default.clone(),
            };
            result.insert(field.inward.clone(), value);
        }
        Ok(result)
    }

    /// Internal record → positional row, fields in declaration order.
    pub fn to_row(&self, record: &Map<String, Value>) -> Result<Vec<Value>> {
        let mut result = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = match record.get(&field.inward) {
                Some(value) => match &field.outward_converter {
                    Some(converter) => converter(value)?,
                    None => value.clone(),
                },
                None => field.default.clone(),
            };
            result.push(value);
        }
        Ok(result)
    }

    /// The inward key a given outward key maps to.
    pub fn inward_key(&self, outward: &str) -> Result<&str> {
        self.fields
            .iter()
            .find(|field| field.outward == outward)
            .map(|field| field.inward.as_str())
            .ok_or_else(|| Error::NotFound(outward.to_string()).into())
    }
}
