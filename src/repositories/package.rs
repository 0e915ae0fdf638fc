//! Registry of packages with soft removal.

use anyhow::Result;

use super::{Repository, SeenTracker};
use crate::errors::Error;
use crate::models::{Model, Package};

/// In-memory registry of [`Package`] models.
///
/// `remove` marks a package as removed rather than dropping it; `commit`
/// prunes the removed entries and `rollback` empties the registry.
#[derive(Default)]
pub struct PackageRepository {
    packages: Vec<Package>,
    seen: SeenTracker,
}

impl PackageRepository {
    pub fn new(packages: Vec<Package>) -> Self {
        Self {
            packages,
            seen: SeenTracker::new(),
        }
    }

    pub fn seen(&self) -> &SeenTracker {
        &self.seen
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().any(|package| package.name() == name)
    }

    /// Whether a package may be added: not registered yet.
    pub fn can_add(&self, package: &Package) -> bool {
        !self.contains(package.name())
    }
}

impl Repository for PackageRepository {
    type Item = Package;

    fn add(&mut self, item: Package) -> Result<()> {
        if !self.can_add(&item) {
            return Err(Error::DuplicateReference(item.reference()).into());
        }
        self.seen.mark(&item.reference());
        self.packages.push(item);
        Ok(())
    }

    fn get(&mut self, reference: &str) -> Result<Option<Package>> {
        let found = self
            .packages
            .iter()
            .find(|package| package.name() == reference)
            .cloned();
        if found.is_some() {
            self.seen.mark(reference);
        }
        Ok(found)
    }

    fn list(&mut self) -> Result<Vec<Package>> {
        let mut results = self.packages.clone();
        results.sort_by(|a, b| a.name().cmp(b.name()));
        for package in &results {
            self.seen.mark(&package.reference());
        }
        Ok(results)
    }

    fn remove(&mut self, reference: &str) -> Result<()> {
        let package = self
            .packages
            .iter_mut()
            .find(|package| package.name() == reference)
            .ok_or_else(|| Error::NotFound(reference.to_string()))?;
        package.mark_removed();
        self.seen.mark(reference);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.packages.retain(|package| !package.is_removed());
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.packages.clear();
        Ok(())
    }
}
