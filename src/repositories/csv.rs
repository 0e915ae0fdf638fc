//! Repository persisting aggregates as rows of a `.csv` file.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{collect_events_from, EventfulRepository, Repository, SeenTracker};
use crate::errors::Error;
use crate::messages::Message;
use crate::models::{Aggregate, Model};
use crate::wrappers::CsvFile;

/// Repository over a `.csv` file, one aggregate per row.
///
/// Rows load lazily on first access. Changes stay in memory until `commit`
/// writes them through the wrapper; `rollback` reloads from disk.
pub struct CsvRepository<T> {
    file: CsvFile,
    items: Vec<T>,
    seen: SeenTracker,
    loaded: bool,
}

impl<T> CsvRepository<T>
where
    T: Model + Clone + Serialize + DeserializeOwned,
{
    pub fn new(file: CsvFile) -> Self {
        Self {
            file,
            items: Vec::new(),
            seen: SeenTracker::new(),
            loaded: false,
        }
    }

    pub fn file(&self) -> &CsvFile {
        &self.file
    }

    pub fn seen(&self) -> &SeenTracker {
        &self.seen
    }

    /// Column names of the backing file.
    pub fn columns(&self) -> Result<Vec<String>> {
        self.file.headers()
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.items = if self.file.path().exists() {
                self.file.read_records()?
            } else {
                Vec::new()
            };
            self.loaded = true;
            debug!(
                path = %self.file.path().display(),
                rows = self.items.len(),
                "loaded csv repository"
            );
        }
        Ok(())
    }
}

impl<T> Repository for CsvRepository<T>
where
    T: Model + Clone + Serialize + DeserializeOwned,
{
    type Item = T;

    fn add(&mut self, item: T) -> Result<()> {
        self.ensure_loaded()?;
        let reference = item.reference();
        if self.items.iter().any(|other| other.reference() == reference) {
            return Err(Error::DuplicateReference(reference).into());
        }
        self.seen.mark(&reference);
        self.items.push(item);
        Ok(())
    }

    fn get(&mut self, reference: &str) -> Result<Option<T>> {
        self.ensure_loaded()?;
        let found = self
            .items
            .iter()
            .find(|item| item.reference() == reference)
            .cloned();
        if found.is_some() {
            self.seen.mark(reference);
        }
        Ok(found)
    }

    fn list(&mut self) -> Result<Vec<T>> {
        self.ensure_loaded()?;
        for item in &self.items {
            self.seen.mark(&item.reference());
        }
        Ok(self.items.clone())
    }

    fn remove(&mut self, reference: &str) -> Result<()> {
        self.ensure_loaded()?;
        let position = self
            .items
            .iter()
            .position(|item| item.reference() == reference)
            .ok_or_else(|| Error::NotFound(reference.to_string()))?;
        self.items.remove(position);
        self.seen.mark(reference);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        self.file.write_records(&self.items)
    }

    fn rollback(&mut self) -> Result<()> {
        self.items = if self.file.path().exists() {
            self.file.read_records()?
        } else {
            Vec::new()
        };
        self.loaded = true;
        Ok(())
    }
}

impl<T> EventfulRepository for CsvRepository<T>
where
    T: Aggregate + Clone + Serialize + DeserializeOwned,
{
    fn collect_events(&mut self) -> Vec<Box<dyn Message>> {
        collect_events_from(self.items.iter_mut(), &self.seen)
    }
}
