//! Wrapper for `.json` files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{guard_writable, FileSystemWrapper};
use crate::settings;
use crate::utils;

/// Wrapper for a single `.json` file.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    pretty: bool,
    read_only: bool,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        utils::ensure_extension(&path, settings::JSON_EXTENSION)?;
        Ok(Self {
            path,
            pretty: false,
            read_only: false,
        })
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deserialize the file contents.
    pub fn read<T: DeserializeOwned>(&self) -> Result<T> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    /// Serialize a value, replacing the file contents.
    pub fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        guard_writable(self.read_only, &self.path)?;
        let contents = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl FileSystemWrapper for JsonFile {
    fn extension(&self) -> &str {
        settings::JSON_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
