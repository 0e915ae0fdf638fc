//! Wrapper for `.xlsx` workbooks.
//!
//! Reads through calamine and writes through rust_xlsxwriter; a sheet is
//! exposed as a list of JSON records keyed by the header row.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Number, Value};

use super::{guard_writable, FileSystemWrapper};
use crate::settings;
use crate::utils;

/// Wrapper for a single `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct XlsxFile {
    path: PathBuf,
    sheet: Option<String>,
    read_only: bool,
}

impl XlsxFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        utils::ensure_extension(&path, settings::XLSX_EXTENSION)?;
        Ok(Self {
            path,
            sheet: None,
            read_only: false,
        })
    }

    /// Address a specific sheet; the first sheet is used otherwise.
    pub fn with_sheet(mut self, sheet: &str) -> Self {
        self.sheet = Some(sheet.to_string());
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Column names from the header row.
    pub fn headers(&self) -> Result<Vec<String>> {
        let range = self.range()?;
        let headers = range
            .rows()
            .next()
            .map(|row| row.iter().map(cell_to_string).collect())
            .unwrap_or_default();
        Ok(headers)
    }

    /// Read every row below the header as a JSON record.
    pub fn read_records(&self) -> Result<Vec<Map<String, Value>>> {
        let range = self.range()?;
        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(cell_to_string).collect())
            .unwrap_or_default();

        let mut results = Vec::new();
        for row in rows {
            let mut record = Map::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                record.insert(header.clone(), cell_to_value(cell));
            }
            results.push(record);
        }
        Ok(results)
    }

    /// Write a header row and records, replacing the workbook.
    pub fn write_records(
        &self,
        headers: &[String],
        records: &[Map<String, Value>],
    ) -> Result<()> {
        guard_writable(self.read_only, &self.path)?;

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        if let Some(name) = &self.sheet {
            worksheet.set_name(name)?;
        }

        for (column, header) in headers.iter().enumerate() {
            worksheet.write_string(0, column as u16, header)?;
        }
        for (index, record) in records.iter().enumerate() {
            let row = (index + 1) as u32;
            for (column, header) in headers.iter().enumerate() {
                let column = column as u16;
                match record.get(header) {
                    Some(Value::Number(number)) => {
                        worksheet.write_number(row, column, number.as_f64().unwrap_or_default())?;
                    }
                    Some(Value::Bool(flag)) => {
                        worksheet.write_boolean(row, column, *flag)?;
                    }
                    Some(Value::String(text)) => {
                        worksheet.write_string(row, column, text)?;
                    }
                    Some(Value::Null) | None => {}
                    Some(other) => {
                        worksheet.write_string(row, column, other.to_string())?;
                    }
                }
            }
        }

        workbook
            .save(&self.path)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    fn range(&self) -> Result<calamine::Range<Data>> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let sheet = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .with_context(|| format!("{} has no sheets", self.path.display()))?,
        };
        let range = workbook
            .worksheet_range(&sheet)
            .with_context(|| format!("failed to read sheet '{}'", sheet))?;
        Ok(range)
    }
}

impl FileSystemWrapper for XlsxFile {
    fn extension(&self) -> &str {
        settings::XLSX_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(text) => text.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(text) => Value::String(text.clone()),
        Data::Bool(flag) => Value::Bool(*flag),
        Data::Int(number) => Value::Number(Number::from(*number)),
        Data::Float(number) => Number::from_f64(*number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        other => Value::String(other.to_string()),
    }
}
