//! Message bus delivering commands and events to their handlers.
//!
//! Commands are matched to a single handler; a handler failure is logged and
//! propagated so the caller that issued the command learns about it. Events
//! are broadcast to every subscribed handler; a failing handler is logged
//! and skipped so the remaining handlers still run.
//!
//! After each successfully handled message the bus collects new events from
//! its unit of work onto the internal queue, so workflows chain until the
//! queue runs dry.

use std::any::TypeId;
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use tracing::{debug, error};

use crate::errors::Error;
use crate::messages::{Message, MessageKind};
use crate::queue::MessageQueue;
use crate::units_of_work::UnitOfWork;

type Handler<U> = Box<dyn FnMut(&dyn Message, &mut U) -> Result<()>>;

/// Delivers commands and events to their registered handlers.
pub struct MessageBus<U: UnitOfWork> {
    uow: U,
    command_handlers: HashMap<TypeId, Handler<U>>,
    event_handlers: HashMap<TypeId, Vec<Handler<U>>>,
    queue: MessageQueue,
}

impl<U: UnitOfWork> MessageBus<U> {
    pub fn new(uow: U) -> Self {
        Self {
            uow,
            command_handlers: HashMap::new(),
            event_handlers: HashMap::new(),
            queue: MessageQueue::new(),
        }
    }

    pub fn uow(&self) -> &U {
        &self.uow
    }

    pub fn uow_mut(&mut self) -> &mut U {
        &mut self.uow
    }

    /// Messages waiting to be handled.
    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    /// Subscribe the handler for a command type.
    ///
    /// A later subscription for the same command replaces the earlier one.
    pub fn subscribe_command<C, H>(&mut self, mut handler: H)
    where
        C: Message,
        H: FnMut(&C, &mut U) -> Result<()> + 'static,
    {
        let wrapped: Handler<U> = Box::new(move |message, uow| {
            let command = message
                .as_any()
                .downcast_ref::<C>()
                .ok_or_else(|| anyhow!("message type mismatch for '{}'", message.name()))?;
            handler(command, uow)
        });
        self.command_handlers.insert(TypeId::of::<C>(), wrapped);
    }

    /// Subscribe an additional handler for an event type.
    pub fn subscribe_event<E, H>(&mut self, mut handler: H)
    where
        E: Message,
        H: FnMut(&E, &mut U) -> Result<()> + 'static,
    {
        let wrapped: Handler<U> = Box::new(move |message, uow| {
            let event = message
                .as_any()
                .downcast_ref::<E>()
                .ok_or_else(|| anyhow!("message type mismatch for '{}'", message.name()))?;
            handler(event, uow)
        });
        self.event_handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Deliver a message, then drain everything it causes.
    pub fn handle(&mut self, message: Box<dyn Message>) -> Result<()> {
        self.handle_with(message, |_| {})
    }

    /// Like [`MessageBus::handle`], additionally invoking `callback` after
    /// every successfully handled message.
    pub fn handle_with(
        &mut self,
        message: Box<dyn Message>,
        mut callback: impl FnMut(&dyn Message),
    ) -> Result<()> {
        self.queue.push(message);
        while let Some(message) = self.queue.pop_front() {
            match message.kind() {
                MessageKind::Command => self.handle_command(message.as_ref())?,
                MessageKind::Event => self.handle_event(message.as_ref()),
            }
            callback(message.as_ref());
        }
        Ok(())
    }

    fn handle_command(&mut self, command: &dyn Message) -> Result<()> {
        let type_id = command.as_any().type_id();
        let handler = self
            .command_handlers
            .get_mut(&type_id)
            .ok_or_else(|| Error::MissingCommandHandler(command.name().to_string()))?;

        debug!(command = command.name(), "handling command");
        if let Err(failure) = handler(command, &mut self.uow) {
            error!(command = command.name(), error = %failure, "error handling command");
            return Err(failure);
        }
        self.collect_events();
        Ok(())
    }

    fn handle_event(&mut self, event: &dyn Message) {
        let type_id = event.as_any().type_id();
        let Some(handlers) = self.event_handlers.get_mut(&type_id) else {
            return;
        };

        let mut delivered = false;
        for handler in handlers.iter_mut() {
            debug!(event = event.name(), "handling event");
            match handler(event, &mut self.uow) {
                Ok(()) => delivered = true,
                Err(failure) => {
                    error!(event = event.name(), error = %failure, "error handling event");
                }
            }
        }
        if delivered {
            self.collect_events();
        }
    }

    fn collect_events(&mut self) {
        let events = self.uow.collect_events();
        self.queue.extend(events);
    }
}
