//! Domain model traits and the package model.
//!
//! Models have one responsibility: to be unique, so every model exposes a
//! reference identifying it. An aggregate additionally records the events
//! raised by the domain model and encapsulates whatever business logic is
//! involved when adding and removing children.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use semver::Version;

use crate::messages::Message;

/// A uniquely identifiable domain object.
pub trait Model {
    /// Unique reference identifying the model.
    fn reference(&self) -> String;
}

/// A model that records events raised by the domain.
pub trait Aggregate: Model {
    type Child;

    /// Drain the events raised since the last collection.
    fn take_events(&mut self) -> Vec<Box<dyn Message>>;

    fn contains(&self, reference: &str) -> bool;

    fn add(&mut self, child: Self::Child) -> Result<()>;

    fn get(&self, reference: &str) -> Option<&Self::Child>;

    fn remove(&mut self, reference: &str) -> Result<()>;
}

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.\d+\.\d+(?:-[0-9A-Za-z.]+)?)").expect("version pattern is valid")
});

/// Parse a semantic version embedded in an artifact filename, e.g.
/// `dodecahedron-1.2.3-alpha.1.crate`.
pub fn version_from_filename(path: &Path) -> Option<Version> {
    let stem = path.file_stem()?.to_str()?;
    let captured = VERSION_PATTERN.find(stem)?;
    Version::parse(captured.as_str()).ok()
}

/// An installable package tracked by the package repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    version: Option<Version>,
    filepath: Option<PathBuf>,
    removed_at: Option<DateTime<Utc>>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            filepath: None,
            removed_at: None,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Attach an artifact path, deriving the version from its filename when
    /// one is embedded there.
    pub fn with_filepath(mut self, filepath: impl Into<PathBuf>) -> Self {
        let filepath = filepath.into();
        if let Some(version) = version_from_filename(&filepath) {
            self.version = Some(version);
        }
        self.filepath = Some(filepath);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    /// Whether the version is a development release.
    pub fn is_dev_release(&self) -> bool {
        self.version
            .as_ref()
            .map(|version| version.pre.as_str().starts_with("dev"))
            .unwrap_or(false)
    }

    /// Whether the version is a pre-release.
    pub fn is_pre_release(&self) -> bool {
        self.version
            .as_ref()
            .map(|version| !version.pre.is_empty())
            .unwrap_or(false)
            && !self.is_dev_release()
    }

    /// Whether the version is a final release.
    pub fn is_final_release(&self) -> bool {
        !self.is_dev_release() && !self.is_pre_release()
    }

    /// Soft-remove the package; removal becomes durable on commit.
    pub fn mark_removed(&mut self) {
        self.removed_at = Some(Utc::now());
    }

    pub fn is_removed(&self) -> bool {
        self.removed_at.is_some()
    }
}

impl Model for Package {
    fn reference(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_version_from_filename() {
        let version = version_from_filename(Path::new("dodecahedron-1.2.3.crate")).unwrap();
        assert_eq!(version, Version::new(1, 2, 3));
    }

    #[test]
    fn test_parses_pre_release_version_from_filename() {
        let version =
            version_from_filename(Path::new("dodecahedron-1.2.3-alpha.1.crate")).unwrap();
        assert_eq!(version.pre.as_str(), "alpha.1");
    }

    #[test]
    fn test_returns_none_without_embedded_version() {
        assert!(version_from_filename(Path::new("dodecahedron.crate")).is_none());
    }

    #[test]
    fn test_filepath_derives_version() {
        let package = Package::new("dodecahedron")
            .with_filepath("artifacts/dodecahedron-2.0.1.crate");
        assert_eq!(package.version(), Some(&Version::new(2, 0, 1)));
    }

    #[test]
    fn test_release_classification() {
        let fin = Package::new("a").with_version(Version::new(1, 0, 0));
        assert!(fin.is_final_release());
        assert!(!fin.is_pre_release());

        let pre = Package::new("b").with_version(Version::parse("1.0.0-alpha.1").unwrap());
        assert!(pre.is_pre_release());
        assert!(!pre.is_final_release());

        let dev = Package::new("c").with_version(Version::parse("1.0.0-dev.3").unwrap());
        assert!(dev.is_dev_release());
        assert!(!dev.is_pre_release());
        assert!(!dev.is_final_release());
    }

    #[test]
    fn test_soft_removal() {
        let mut package = Package::new("dodecahedron");
        assert!(!package.is_removed());
        package.mark_removed();
        assert!(package.is_removed());
    }
}
