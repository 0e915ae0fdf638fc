//! Unit of work that records domain events for the bus to collect.

use anyhow::Result;

use super::UnitOfWork;
use crate::messages::Message;
use crate::queue::MessageQueue;

/// Unit of work carrying a queue of raised events.
///
/// Entering a scope clears events left over from an earlier one; collection
/// drains the queue in creation order.
#[derive(Default)]
pub struct EventfulUnitOfWork {
    events: MessageQueue,
}

impl EventfulUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event for later collection.
    pub fn raise_event(&mut self, event: Box<dyn Message>) {
        self.events.push(event);
    }

    /// Events raised and not yet collected.
    pub fn events(&self) -> &MessageQueue {
        &self.events
    }
}

impl UnitOfWork for EventfulUnitOfWork {
    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        Ok(())
    }

    fn begin(&mut self) -> Result<()> {
        self.events.clear();
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

    struct SomethingHappened {
        stamp: Stamp,
    }

    impl SomethingHappened {
        fn new() -> Box<dyn Message> {
            Box::new(SomethingHappened { stamp: Stamp::now() })
        }
    }

    impl Message for SomethingHappened {
        fn kind(&self) -> MessageKind {
            MessageKind::Event
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.stamp.time()
        }

        fn name(&self) -> &'static str {
            "SomethingHappened"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_collect_events_drains_queue() {
        let mut uow = EventfulUnitOfWork::new();
        uow.raise_event(SomethingHappened::new());
        uow.raise_event(SomethingHappened::new());

        let events = uow.collect_events();
        assert_eq!(events.len(), 2);
        assert!(uow.events().is_empty());
    }

    #[test]
    fn test_begin_clears_stale_events() {
        let mut uow = EventfulUnitOfWork::new();
        uow.raise_event(SomethingHappened::new());
        uow.begin().unwrap();
        assert!(uow.events().is_empty());
    }
}
