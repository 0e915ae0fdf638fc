//! Crate-wide defaults and canonical file extensions.

// File extensions, normalized (no leading dot)
pub const CSV_EXTENSION: &str = "csv";
pub const JSON_EXTENSION: &str = "json";
pub const PDF_EXTENSION: &str = "pdf";
pub const TXT_EXTENSION: &str = "txt";
pub const XLSX_EXTENSION: &str = "xlsx";
pub const ZIP_EXTENSION: &str = "zip";

// Defaults
pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_CSV_QUOTE: u8 = b'"';
pub const DEFAULT_TXT_NEWLINE: &str = "\n";
