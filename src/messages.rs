//! Messages delivered through the bus.
//!
//! Commands capture an intent for the system to perform a particular action
//! and are matched to exactly one handler; they are named with imperative
//! verb phrases. Events are broadcast to every subscribed handler and
//! reflect workflows of the form "if this happens, then do that"; they are
//! named with past-tense verb phrases.

use std::any::Any;
use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// Whether a message is dispatched as a command or broadcast as an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Command,
    Event,
}

/// A timestamped message moving through the system.
///
/// Messages are delivered oldest-first; the creation time recorded at
/// construction decides the order.
pub trait Message: Any + Send {
    /// Dispatch category of this message.
    fn kind(&self) -> MessageKind;

    /// Creation time of this message.
    fn created_at(&self) -> DateTime<Utc>;

    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Downcast support for typed handlers.
    fn as_any(&self) -> &dyn Any;
}

/// Creation timestamp recorded when a message is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stamp(DateTime<Utc>);

impl Stamp {
    /// Stamp for a message constructed now.
    pub fn now() -> Self {
        Stamp(Utc::now())
    }

    /// Stamp for a specific moment.
    pub fn at(moment: DateTime<Utc>) -> Self {
        Stamp(moment)
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for Stamp {
    fn default() -> Self {
        Self::now()
    }
}

/// Order two messages by creation time.
pub fn by_creation(a: &dyn Message, b: &dyn Message) -> Ordering {
    a.created_at().cmp(&b.created_at())
}
