//! File wrappers used by the file-backed repositories.
//!
//! A wrapper addresses either a single file or a directory of files sharing
//! an extension. Wrappers validate extensions at construction and a
//! read-only wrapper refuses write access.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;

use crate::errors::Error;

pub mod csv;
pub mod json;
pub mod pdf;
pub mod txt;
#[cfg(feature = "xlsx")]
pub mod xlsx;

pub use self::csv::{CsvDirectory, CsvFile};
pub use self::json::JsonFile;
pub use self::pdf::{PdfDirectory, PdfFile};
pub use self::txt::{TxtDirectory, TxtFile};
#[cfg(feature = "xlsx")]
pub use self::xlsx::XlsxFile;

/// File access mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Read,
    Write,
    Append,
}

impl FileMode {
    pub fn is_write(&self) -> bool {
        matches!(self, FileMode::Write | FileMode::Append)
    }

    /// Open options equivalent to this mode.
    pub fn open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            FileMode::Read => {
                options.read(true);
            }
            FileMode::Write => {
                options.write(true).create(true).truncate(true);
            }
            FileMode::Append => {
                options.append(true).create(true);
            }
        }
        options
    }
}

/// Behavior common to file and directory wrappers.
pub trait FileSystemWrapper {
    /// Extension handled by this wrapper, without the leading dot.
    fn extension(&self) -> &str;

    /// Whether write access is refused.
    fn is_read_only(&self) -> bool;
}

pub(crate) fn guard_writable(read_only: bool, path: &Path) -> Result<()> {
    if read_only {
        return Err(Error::ReadOnly(path.display().to_string()).into());
    }
    Ok(())
}

pub(crate) fn ensure_directory(directory: &Path) -> Result<()> {
    if !directory.is_dir() {
        anyhow::bail!("{} is not a valid directory", directory.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_mode_classification() {
        assert!(!FileMode::Read.is_write());
        assert!(FileMode::Write.is_write());
        assert!(FileMode::Append.is_write());
    }

    #[test]
    fn test_guard_writable_refuses_read_only() {
        let result = guard_writable(true, Path::new("data.txt"));
        assert!(result.unwrap_err().to_string().contains("read-only"));
        assert!(guard_writable(false, Path::new("data.txt")).is_ok());
    }
}
