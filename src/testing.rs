//! Test doubles for repositories and units of work.
//!
//! The fakes are compiled into the crate, not hidden behind `cfg(test)`, so
//! downstream crates can drive their own service layers against them.

use anyhow::Result;

use crate::messages::Message;
use crate::models::{Aggregate, Model};
use crate::queue::MessageQueue;
use crate::repositories::{collect_events_from, EventfulRepository, Repository, SeenTracker};
use crate::units_of_work::UnitOfWork;

/// In-memory repository recording which lifecycle calls happened.
pub struct FakeRepository<T> {
    objects: Vec<T>,
    seen: SeenTracker,
    committed: bool,
    rolled_back: bool,
    closed: bool,
}

impl<T: Model + Clone> FakeRepository<T> {
    pub fn new() -> Self {
        Self::with_objects(Vec::new())
    }

    pub fn with_objects(objects: Vec<T>) -> Self {
        Self {
            objects,
            seen: SeenTracker::new(),
            committed: false,
            rolled_back: false,
            closed: false,
        }
    }

    pub fn seen(&self) -> &SeenTracker {
        &self.seen
    }

    /// Whether `commit` was called.
    pub fn committed(&self) -> bool {
        self.committed
    }

    /// Whether `rollback` was called.
    pub fn rolled_back(&self) -> bool {
        self.rolled_back
    }

    /// Whether `close` was called.
    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.objects.iter().any(|item| item.reference() == reference)
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl<T: Model + Clone> Default for FakeRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model + Clone> Repository for FakeRepository<T> {
    type Item = T;

    fn add(&mut self, item: T) -> Result<()> {
        self.seen.mark(&item.reference());
        self.objects.push(item);
        Ok(())
    }

    fn get(&mut self, reference: &str) -> Result<Option<T>> {
        let found = self
            .objects
            .iter()
            .find(|item| item.reference() == reference)
            .cloned();
        if found.is_some() {
            self.seen.mark(reference);
        }
        Ok(found)
    }

    fn list(&mut self) -> Result<Vec<T>> {
        for item in &self.objects {
            self.seen.mark(&item.reference());
        }
        Ok(self.objects.clone())
    }

    fn remove(&mut self, reference: &str) -> Result<()> {
        self.objects.retain(|item| item.reference() != reference);
        self.seen.mark(reference);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = true;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.rolled_back = true;
        Ok(())
    }
}

impl<T: Aggregate + Clone> EventfulRepository for FakeRepository<T> {
    fn collect_events(&mut self) -> Vec<Box<dyn Message>> {
        collect_events_from(self.objects.iter_mut(), &self.seen)
    }
}

/// Unit of work recording which lifecycle calls happened.
#[derive(Default)]
pub struct FakeUnitOfWork {
    committed: bool,
    rolled_back: bool,
}

impl FakeUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `commit` was called.
    pub fn committed(&self) -> bool {
        self.committed
    }

    /// Whether `rollback` was called.
    pub fn rolled_back(&self) -> bool {
        self.rolled_back
    }
}

impl UnitOfWork for FakeUnitOfWork {
    fn commit(&mut self) -> Result<()> {
        self.committed = true;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.rolled_back = true;
        Ok(())
    }
}

/// Eventful unit of work recording which lifecycle calls happened.
#[derive(Default)]
pub struct FakeEventfulUnitOfWork {
    events: MessageQueue,
    committed: bool,
    rolled_back: bool,
}

impl FakeEventfulUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise_event(&mut self, event: Box<dyn Message>) {
        self.events.push(event);
    }

    pub fn committed(&self) -> bool {
        self.committed
    }

    pub fn rolled_back(&self) -> bool {
        self.rolled_back
    }
}

impl UnitOfWork for FakeEventfulUnitOfWork {
    fn commit(&mut self) -> Result<()> {
        self.committed = true;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.rolled_back = true;
        Ok(())
    }

    fn collect_events(&mut self) -> Vec<Box<dyn Message>> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessageKind, Stamp};
    use chrono::{DateTime, Utc};
    use std::any::Any;

    #[derive(Clone)]
    struct Order {
        reference: String,
    }

    impl Model for Order {
        fn reference(&self) -> String {
            self.reference.clone()
        }
    }

    struct OrderPlaced {
        stamp: Stamp,
    }

    impl Message for OrderPlaced {
        fn kind(&self) -> MessageKind {
            MessageKind::Event
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.stamp.time()
        }

        fn name(&self) -> &'static str {
            "OrderPlaced"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Clone)]
    struct Basket {
        reference: String,
        pending: usize,
    }

    impl Model for Basket {
        fn reference(&self) -> String {
            self.reference.clone()
        }
    }

    impl Aggregate for Basket {
        type Child = Order;

        fn take_events(&mut self) -> Vec<Box<dyn Message>> {
            let drained = (0..self.pending)
                .map(|_| Box::new(OrderPlaced { stamp: Stamp::now() }) as Box<dyn Message>)
                .collect();
            self.pending = 0;
            drained
        }

        fn contains(&self, _reference: &str) -> bool {
            false
        }

        fn add(&mut self, _child: Order) -> Result<()> {
            Ok(())
        }

        fn get(&self, _reference: &str) -> Option<&Order> {
            None
        }

        fn remove(&mut self, _reference: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fake_repository_stores_and_lists() {
        let mut repository = FakeRepository::new();
        repository
            .add(Order {
                reference: "o-1".to_string(),
            })
            .unwrap();

        assert!(repository.contains("o-1"));
        assert_eq!(repository.list().unwrap().len(), 1);
        assert!(repository.get("o-1").unwrap().is_some());
        assert!(repository.get("o-2").unwrap().is_none());
    }

    #[test]
    fn test_fake_repository_records_lifecycle_calls() {
        let mut repository: FakeRepository<Order> = FakeRepository::new();
        assert!(!repository.committed());

        repository.commit().unwrap();
        repository.rollback().unwrap();
        repository.close();

        assert!(repository.committed());
        assert!(repository.rolled_back());
        assert!(repository.closed());
    }

    #[test]
    fn test_fake_repository_collects_events_from_seen_aggregates() {
        let mut repository = FakeRepository::with_objects(vec![
            Basket {
                reference: "b-1".to_string(),
                pending: 2,
            },
            Basket {
                reference: "b-2".to_string(),
                pending: 1,
            },
        ]);

        // Only b-1 has been seen, so only its events are harvested.
        repository.get("b-1").unwrap();
        let events = repository.collect_events();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_fake_unit_of_work_records_calls() {
        let mut uow = FakeUnitOfWork::new();
        uow.commit().unwrap();
        assert!(uow.committed());
        assert!(!uow.rolled_back());
    }

    #[test]
    fn test_fake_eventful_unit_of_work_collects_events() {
        let mut uow = FakeEventfulUnitOfWork::new();
        uow.raise_event(Box::new(OrderPlaced { stamp: Stamp::now() }));
        assert_eq!(uow.collect_events().len(), 1);
        assert!(uow.collect_events().is_empty());
    }
}
