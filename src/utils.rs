//! File-extension helpers shared by the wrapper layer.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::errors::Error;

/// Normalize a file extension: strip leading wildcard and dot characters
/// and lowercase the rest. `"*"` is preserved as a match-all.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().trim_start_matches(['*', '.']);
    if trimmed.is_empty() {
        "*".to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// Check whether a file carries the expected extension.
pub fn has_extension(file: &Path, extension: &str) -> bool {
    let expected = normalize_extension(extension);
    if expected == "*" {
        return true;
    }
    match file.extension().and_then(|actual| actual.to_str()) {
        Some(actual) => actual.eq_ignore_ascii_case(&expected),
        None => false,
    }
}

/// Error when a file does not carry the expected extension.
pub fn ensure_extension(file: &Path, extension: &str) -> Result<()> {
    if !has_extension(file, extension) {
        let name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        return Err(Error::UnexpectedExtension {
            file: name,
            extension: normalize_extension(extension),
        }
        .into());
    }
    Ok(())
}

/// Set the extension on a path unless it already carries it.
pub fn set_extension(file: &Path, extension: &str) -> PathBuf {
    let normalized = normalize_extension(extension);
    if normalized == "*" || has_extension(file, &normalized) {
        file.to_path_buf()
    } else {
        file.with_extension(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension_strips_dot_and_lowercases() {
        assert_eq!(normalize_extension(".CSV"), "csv");
        assert_eq!(normalize_extension("*.txt"), "txt");
        assert_eq!(normalize_extension("xlsx"), "xlsx");
    }

    #[test]
    fn test_normalize_extension_preserves_wildcard() {
        assert_eq!(normalize_extension("*"), "*");
        assert_eq!(normalize_extension(""), "*");
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("data/report.csv"), ".csv"));
        assert!(has_extension(Path::new("report.CSV"), "csv"));
        assert!(!has_extension(Path::new("report.txt"), "csv"));
        assert!(has_extension(Path::new("report.txt"), "*"));
    }

    #[test]
    fn test_ensure_extension_errors_on_mismatch() {
        let result = ensure_extension(Path::new("report.txt"), "csv");
        let error = result.unwrap_err();
        assert!(error.to_string().contains("is not a '.csv' file"));
    }

    #[test]
    fn test_set_extension() {
        assert_eq!(
            set_extension(Path::new("report"), "csv"),
            PathBuf::from("report.csv")
        );
        assert_eq!(
            set_extension(Path::new("report.csv"), ".csv"),
            PathBuf::from("report.csv")
        );
    }
}
