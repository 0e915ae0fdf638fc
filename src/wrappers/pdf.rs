//! Wrappers for `.pdf` files.
//!
//! PDF content is treated as opaque bytes; rendering and parsing stay with
//! the caller.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{ensure_directory, guard_writable, FileSystemWrapper};
use crate::settings;
use crate::utils;

/// Wrapper for a single `.pdf` file.
#[derive(Debug, Clone)]
pub struct PdfFile {
    path: PathBuf,
    read_only: bool,
}

impl PdfFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        utils::ensure_extension(&path, settings::PDF_EXTENSION)?;
        Ok(Self {
            path,
            read_only: false,
        })
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    pub fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        guard_writable(self.read_only, &self.path)?;
        fs::write(&self.path, bytes)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl FileSystemWrapper for PdfFile {
    fn extension(&self) -> &str {
        settings::PDF_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// Wrapper for the `.pdf` files in a directory.
#[derive(Debug, Clone)]
pub struct PdfDirectory {
    directory: PathBuf,
    read_only: bool,
}

impl PdfDirectory {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        ensure_directory(&directory)?;
        Ok(Self {
            directory,
            read_only: false,
        })
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Open a file in the directory, adding the extension when absent.
    pub fn open(&self, filename: &str) -> Result<PdfFile> {
        let path = utils::set_extension(&self.directory.join(filename), settings::PDF_EXTENSION);
        Ok(PdfFile::new(path)?.read_only(self.read_only))
    }

    /// Paths of the `.pdf` files currently in the directory.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();
        for entry in fs::read_dir(&self.directory)
            .with_context(|| format!("failed to read {}", self.directory.display()))?
        {
            let path = entry?.path();
            if path.is_file() && utils::has_extension(&path, settings::PDF_EXTENSION) {
                results.push(path);
            }
        }
        results.sort();
        Ok(results)
    }
}

impl FileSystemWrapper for PdfDirectory {
    fn extension(&self) -> &str {
        settings::PDF_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
