//! Dispatchers own a message bus and feed messages into it.

use anyhow::Result;

use crate::messagebus::MessageBus;
use crate::messages::Message;
use crate::units_of_work::UnitOfWork;

/// Entry point for pushing messages onto a bus.
pub struct Dispatcher<U: UnitOfWork> {
    bus: MessageBus<U>,
}

impl<U: UnitOfWork> Dispatcher<U> {
    pub fn new(bus: MessageBus<U>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &MessageBus<U> {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut MessageBus<U> {
        &mut self.bus
    }

    pub fn dispatch(&mut self, message: Box<dyn Message>) -> Result<()> {
        self.bus.handle(message)
    }
}

/// Dispatcher over a progressive unit of work, exposing its progress bar.
///
/// The bus type guarantees the unit of work actually carries a bar.
#[cfg(feature = "progress")]
pub struct ProgressiveDispatcher<U, P>
where
    U: UnitOfWork,
    P: crate::progress::ProgressBar,
{
    bus: MessageBus<crate::units_of_work::ProgressiveUnitOfWork<U, P>>,
}

#[cfg(feature = "progress")]
impl<U, P> ProgressiveDispatcher<U, P>
where
    U: UnitOfWork,
    P: crate::progress::ProgressBar,
{
    pub fn new(bus: MessageBus<crate::units_of_work::ProgressiveUnitOfWork<U, P>>) -> Self {
        Self { bus }
    }

    pub fn bus_mut(
        &mut self,
    ) -> &mut MessageBus<crate::units_of_work::ProgressiveUnitOfWork<U, P>> {
        &mut self.bus
    }

    /// Progress bar of the underlying unit of work.
    pub fn progress(&mut self) -> &mut P {
        self.bus.uow_mut().progress()
    }

    pub fn dispatch(&mut self, message: Box<dyn Message>) -> Result<()> {
        self.bus.handle(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{MessageKind, Stamp};
    use crate::units_of_work::EventfulUnitOfWork;
    use chrono::{DateTime, Utc};
    use std::any::Any;
    use std::cell::Cell;
    use std::rc::Rc;

    struct RunReport {
        stamp: Stamp,
    }

    impl Message for RunReport {
        fn kind(&self) -> MessageKind {
            MessageKind::Command
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.stamp.time()
        }

        fn name(&self) -> &'static str {
            "RunReport"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_dispatch_forwards_to_bus() {
        let mut bus = MessageBus::new(EventfulUnitOfWork::new());
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        bus.subscribe_command(move |_: &RunReport, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        let mut dispatcher = Dispatcher::new(bus);
        dispatcher
            .dispatch(Box::new(RunReport { stamp: Stamp::now() }))
            .unwrap();
        assert_eq!(calls.get(), 1);
    }
}
