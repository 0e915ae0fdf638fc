//! Error taxonomy shared across the crate.
//!
//! Most fallible operations return [`anyhow::Result`]; the variants here
//! cover the failures callers are expected to match on.

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// A command reached the bus without a registered handler.
    MissingCommandHandler(String),
    /// An object with the same reference is already stored.
    DuplicateReference(String),
    /// No object with the given reference exists.
    NotFound(String),
    /// A write was attempted through a read-only wrapper.
    ReadOnly(String),
    /// A file does not carry the extension its wrapper requires.
    UnexpectedExtension { file: String, extension: String },
    /// A value could not be converted to the requested type.
    Conversion { expected: &'static str, value: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingCommandHandler(name) => {
                write!(f, "no handler subscribed for command '{}'", name)
            }
            Error::DuplicateReference(reference) => {
                write!(f, "an object with reference '{}' already exists", reference)
            }
            Error::NotFound(reference) => {
                write!(f, "no object with reference '{}'", reference)
            }
            Error::ReadOnly(path) => write!(f, "{} is read-only", path),
            Error::UnexpectedExtension { file, extension } => {
                write!(f, "{} is not a '.{}' file", file, extension)
            }
            Error::Conversion { expected, value } => {
                write!(f, "unable to convert {} to {}", value, expected)
            }
        }
    }
}

impl std::error::Error for Error {}
