//! Repository pattern.
//!
//! A repository stores aggregates and hides how. Repositories track the
//! references of the aggregates they hand out or accept ("seen"), so that
//! the events raised by exactly those aggregates can be harvested between
//! messages.

use std::collections::HashSet;

use anyhow::Result;

use crate::messages::{by_creation, Message};
use crate::models::Aggregate;

pub mod csv;
pub mod package;
#[cfg(feature = "database")]
pub mod sql;
pub mod txt;
#[cfg(feature = "xlsx")]
pub mod xlsx;

pub use self::csv::CsvRepository;
pub use self::package::PackageRepository;
#[cfg(feature = "database")]
pub use self::sql::{SessionedRepository, SqlSession};
pub use self::txt::TxtRepository;
#[cfg(feature = "xlsx")]
pub use self::xlsx::XlsxRepository;

/// Stores and retrieves aggregates of one kind.
pub trait Repository {
    type Item;

    /// Add an object to the repository.
    fn add(&mut self, item: Self::Item) -> Result<()>;

    /// Get an object by reference.
    fn get(&mut self, reference: &str) -> Result<Option<Self::Item>>;

    /// List the objects in the repository.
    fn list(&mut self) -> Result<Vec<Self::Item>>;

    /// Remove the object with the given reference.
    fn remove(&mut self, reference: &str) -> Result<()>;

    /// Commit changes to the repository.
    fn commit(&mut self) -> Result<()>;

    /// Roll back changes to the repository.
    fn rollback(&mut self) -> Result<()>;
}

/// Repository able to hand over the events its aggregates raised.
pub trait EventfulRepository: Repository {
    /// Drain the events raised by the seen aggregates, oldest first.
    fn collect_events(&mut self) -> Vec<Box<dyn Message>>;
}

/// References of the aggregates a repository has handed out or accepted.
#[derive(Debug, Clone, Default)]
pub struct SeenTracker {
    references: HashSet<String>,
}

impl SeenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, reference: &str) {
        self.references.insert(reference.to_string());
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.references.contains(reference)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn clear(&mut self) {
        self.references.clear();
    }
}

/// Drain the events raised by the seen aggregates, oldest first.
pub fn collect_events_from<'a, A, I>(items: I, seen: &SeenTracker) -> Vec<Box<dyn Message>>
where
    A: Aggregate + 'a,
    I: IntoIterator<Item = &'a mut A>,
{
    let mut events: Vec<Box<dyn Message>> = Vec::new();
    for item in items {
        if seen.contains(&item.reference()) {
            events.extend(item.take_events());
        }
    }
    events.sort_by(|a, b| by_creation(a.as_ref(), b.as_ref()));
    events
}
