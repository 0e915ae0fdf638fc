//! Repository persisting records as rows of an `.xlsx` workbook.

use anyhow::Result;
use serde_json::{Map, Value};

use super::{Repository, SeenTracker};
use crate::errors::Error;
use crate::wrappers::XlsxFile;

/// Repository over an `.xlsx` workbook, one JSON record per row.
///
/// Records are keyed by the value of `key_column`. Changes stay in memory
/// until `commit` writes them through the wrapper; `rollback` reloads from
/// disk.
pub struct XlsxRepository {
    file: XlsxFile,
    key_column: String,
    columns: Vec<String>,
    records: Vec<Map<String, Value>>,
    seen: SeenTracker,
    loaded: bool,
}

impl XlsxRepository {
    pub fn new(file: XlsxFile, key_column: &str, columns: Vec<String>) -> Self {
        Self {
            file,
            key_column: key_column.to_string(),
            columns,
            records: Vec::new(),
            seen: SeenTracker::new(),
            loaded: false,
        }
    }

    pub fn file(&self) -> &XlsxFile {
        &self.file
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn seen(&self) -> &SeenTracker {
        &self.seen
    }

    fn reference_of(&self, record: &Map<String, Value>) -> String {
        match record.get(&self.key_column) {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            if self.file.path().exists() {
                self.records = self.file.read_records()?;
                let headers = self.file.headers()?;
                if !headers.is_empty() {
                    self.columns = headers;
                }
            } else {
                self.records = Vec::new();
            }
            self.loaded = true;
        }
        Ok(())
    }
}

impl Repository for XlsxRepository {
    type Item = Map<String, Value>;

    fn add(&mut self, item: Map<String, Value>) -> Result<()> {
        self.ensure_loaded()?;
        let reference = self.reference_of(&item);
        if self
            .records
            .iter()
            .any(|record| self.reference_of(record) == reference)
        {
            return Err(Error::DuplicateReference(reference).into());
        }
        self.seen.mark(&reference);
        self.records.push(item);
        Ok(())
    }

    fn get(&mut self, reference: &str) -> Result<Option<Map<String, Value>>> {
        self.ensure_loaded()?;
        let found = self
            .records
            .iter()
            .find(|record| self.reference_of(record) == reference)
            .cloned();
        if found.is_some() {
            self.seen.mark(reference);
        }
        Ok(found)
    }

    fn list(&mut self) -> Result<Vec<Map<String, Value>>> {
        self.ensure_loaded()?;
        let references: Vec<String> = self
            .records
            .iter()
            .map(|record| self.reference_of(record))
            .collect();
        for reference in references {
            self.seen.mark(&reference);
        }
        Ok(self.records.clone())
    }

    fn remove(&mut self, reference: &str) -> Result<()> {
        self.ensure_loaded()?;
        let position = self
            .records
            .iter()
            .position(|record| self.reference_of(record) == reference)
            .ok_or_else(|| Error::NotFound(reference.to_string()))?;
        self.records.remove(position);
        self.seen.mark(reference);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        self.file.write_records(&self.columns, &self.records)
    }

    fn rollback(&mut self) -> Result<()> {
        self.loaded = false;
        self.ensure_loaded()
    }
}
