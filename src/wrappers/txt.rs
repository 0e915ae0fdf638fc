//! Wrappers for `.txt` files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{ensure_directory, guard_writable, FileMode, FileSystemWrapper};
use crate::settings;
use crate::utils;

/// Wrapper for a single `.txt` file.
#[derive(Debug, Clone)]
pub struct TxtFile {
    path: PathBuf,
    newline: String,
    read_only: bool,
}

impl TxtFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        utils::ensure_extension(&path, settings::TXT_EXTENSION)?;
        Ok(Self {
            path,
            newline: settings::DEFAULT_TXT_NEWLINE.to_string(),
            read_only: false,
        })
    }

    pub fn with_newline(mut self, newline: &str) -> Self {
        self.newline = newline.to_string();
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file.
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// Read the file as lines, without terminators.
    pub fn read_lines(&self) -> Result<Vec<String>> {
        let contents = self.read()?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    /// Replace the file contents.
    pub fn write(&self, contents: &str) -> Result<()> {
        guard_writable(self.read_only, &self.path)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// Replace the file contents with one record per line.
    pub fn write_lines(&self, lines: &[String]) -> Result<()> {
        let mut contents = lines.join(&self.newline);
        if !contents.is_empty() {
            contents.push_str(&self.newline);
        }
        self.write(&contents)
    }

    /// Append a single line.
    pub fn append_line(&self, line: &str) -> Result<()> {
        guard_writable(self.read_only, &self.path)?;
        let mut file = FileMode::Append
            .open_options()
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        write!(file, "{}{}", line, self.newline)?;
        Ok(())
    }
}

impl FileSystemWrapper for TxtFile {
    fn extension(&self) -> &str {
        settings::TXT_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// Wrapper for the `.txt` files in a directory.
#[derive(Debug, Clone)]
pub struct TxtDirectory {
    directory: PathBuf,
    newline: String,
    read_only: bool,
}

impl TxtDirectory {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        ensure_directory(&directory)?;
        Ok(Self {
            directory,
            newline: settings::DEFAULT_TXT_NEWLINE.to_string(),
            read_only: false,
        })
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Open a file in the directory, adding the extension when absent.
    pub fn open(&self, filename: &str) -> Result<TxtFile> {
        let path = utils::set_extension(&self.directory.join(filename), settings::TXT_EXTENSION);
        let file = TxtFile::new(path)?
            .with_newline(&self.newline)
            .read_only(self.read_only);
        Ok(file)
    }

    /// Paths of the `.txt` files currently in the directory.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();
        for entry in fs::read_dir(&self.directory)
            .with_context(|| format!("failed to read {}", self.directory.display()))?
        {
            let path = entry?.path();
            if path.is_file() && utils::has_extension(&path, settings::TXT_EXTENSION) {
                results.push(path);
            }
        }
        results.sort();
        Ok(results)
    }
}

impl FileSystemWrapper for TxtDirectory {
    fn extension(&self) -> &str {
        settings::TXT_EXTENSION
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
