//! Message brokers fan payloads out to channel subscribers.

use anyhow::Result;
use chrono::{DateTime, Utc};

pub mod in_memory;
pub mod threaded;

pub use in_memory::InMemoryBroker;
pub use threaded::ThreadedBroker;

/// Payload delivered to subscribers, wrapped with its creation time.
#[derive(Debug, Clone)]
pub struct BrokerMessage {
    pub data: String,
    pub created_at: DateTime<Utc>,
}

impl BrokerMessage {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            created_at: Utc::now(),
        }
    }
}

/// Function called for every message on a subscribed channel.
pub type Subscriber = Box<dyn Fn(&BrokerMessage) -> Result<()> + Send + Sync>;

/// Strategy applied when a subscriber fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStrategy {
    /// Log the failure and keep delivering.
    #[default]
    Ignore,
    /// Stop delivery and surface the failure.
    Raise,
}

/// Fans messages out to the subscribers of named channels.
pub trait MessageBroker {
    /// Names of the channels with at least one subscriber.
    fn channels(&self) -> Vec<String>;

    /// Publish a message to a channel.
    fn publish(&self, channel: &str, message: &str) -> Result<()>;

    /// Add a subscriber to a channel.
    fn subscribe(&self, channel: &str, subscriber: Subscriber);
}
