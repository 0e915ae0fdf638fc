//! Wrappers for `.csv` files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ensure_directory, guard_writable, FileSystemWrapper};
use crate::settings;
use crate::utils;

/// Wrapper for a single `.csv` file.
#[derive(Debug, Clone)]
pub struct CsvFile {
    path: PathBuf,
    delimiter: u8,
    quote: u8,
    has_headers: bool,
    read_only: bool,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        utils::ensure_extension(&path, settings::CSV_EXTENSION)?;
        Ok(Self {
            path,
            delimiter: settings::DEFAULT_CSV_DELIMITER,
            quote: settings::DEFAULT_CSV_QUOTE,
            has_headers: true,
            read_only: false,
        })
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Column names from the header row.
    pub fn headers(&self) -> Result<Vec<String>> {
        let mut reader = self.reader()?;
        let headers = reader
            .headers()
            .with_context(|| format!("failed to read headers from {}", self.path.display()))?;
        Ok(headers.iter().map(str::to_string).collect())
    }

    /// Deserialize every row.
    pub fn read_records<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let mut reader = self.reader()?;
        let mut results = Vec::new();
        for record in reader.deserialize() {
            let record: T = record
                .with_context(|| format!("failed to parse row in {}", self.path.display()))?;
            results.push(record);
        }
        Ok(results)
    }

    /// Serialize records, replacing the file contents.
    pub fn write_records<T: Serialize>(&self, records: &[T]) -> Result<()> {
        guard_writable(self.read_only, &self.path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(self.has_headers)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn reader(&self) -> Result<csv::Reader<fs::File>> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .has_headers(self.has_headers)
            .from_path(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))
    }
}

impl FileSystemWrapper for CsvFile {
    fn extension(&self) -> &str {
        settings::CSV_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// Wrapper for the `.csv` files in a directory.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    directory: PathBuf,
    delimiter: u8,
    quote: u8,
    has_headers: bool,
    read_only: bool,
}

impl CsvDirectory {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        ensure_directory(&directory)?;
        Ok(Self {
            directory,
            delimiter: settings::DEFAULT_CSV_DELIMITER,
            quote: settings::DEFAULT_CSV_QUOTE,
            has_headers: true,
            read_only: false,
        })
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Open a file in the directory, adding the extension when absent.
    pub fn open(&self, filename: &str) -> Result<CsvFile> {
        let path = utils::set_extension(&self.directory.join(filename), settings::CSV_EXTENSION);
        let file = CsvFile::new(path)?
            .with_delimiter(self.delimiter)
            .with_quote(self.quote)
            .with_headers(self.has_headers)
            .read_only(self.read_only);
        Ok(file)
    }

    /// Paths of the `.csv` files currently in the directory.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();
        for entry in fs::read_dir(&self.directory)
            .with_context(|| format!("failed to read {}", self.directory.display()))?
        {
            let path = entry?.path();
            if path.is_file() && utils::has_extension(&path, settings::CSV_EXTENSION) {
                results.push(path);
            }
        }
        results.sort();
        Ok(results)
    }
}

impl FileSystemWrapper for CsvDirectory {
    fn extension(&self) -> &str {
        settings::CSV_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
