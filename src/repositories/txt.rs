//! Repository persisting records as lines of a `.txt` file.

use anyhow::Result;

use super::{Repository, SeenTracker};
use crate::errors::Error;
use crate::wrappers::TxtFile;

/// Repository over a `.txt` file, one record per line.
///
/// A line is its own reference. Changes stay in memory until `commit`
/// writes them through the wrapper; `rollback` reloads from disk.
pub struct TxtRepository {
    file: TxtFile,
    lines: Vec<String>,
    seen: SeenTracker,
    loaded: bool,
}

impl TxtRepository {
    pub fn new(file: TxtFile) -> Self {
        Self {
            file,
            lines: Vec::new(),
            seen: SeenTracker::new(),
            loaded: false,
        }
    }

    pub fn file(&self) -> &TxtFile {
        &self.file
    }

    pub fn seen(&self) -> &SeenTracker {
        &self.seen
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.lines = if self.file.path().exists() {
                self.file.read_lines()?
            } else {
                Vec::new()
            };
            self.loaded = true;
        }
        Ok(())
    }
}

impl Repository for TxtRepository {
    type Item = String;

    fn add(&mut self, item: String) -> Result<()> {
        self.ensure_loaded()?;
        if self.lines.contains(&item) {
            return Err(Error::DuplicateReference(item).into());
        }
        self.seen.mark(&item);
        self.lines.push(item);
        Ok(())
    }

    fn get(&mut self, reference: &str) -> Result<Option<String>> {
        self.ensure_loaded()?;
        let found = self.lines.iter().find(|line| *line == reference).cloned();
        if found.is_some() {
            self.seen.mark(reference);
        }
        Ok(found)
    }

    fn list(&mut self) -> Result<Vec<String>> {
        self.ensure_loaded()?;
        for line in &self.lines {
            self.seen.mark(line);
        }
        Ok(self.lines.clone())
    }

    fn remove(&mut self, reference: &str) -> Result<()> {
        self.ensure_loaded()?;
        let position = self
            .lines
            .iter()
            .position(|line| line == reference)
            .ok_or_else(|| Error::NotFound(reference.to_string()))?;
        self.lines.remove(position);
        self.seen.mark(reference);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        self.file.write_lines(&self.lines)
    }

    fn rollback(&mut self) -> Result<()> {
        self.lines = if self.file.path().exists() {
            self.file.read_lines()?
        } else {
            Vec::new()
        };
        self.loaded = true;
        Ok(())
    }
}
