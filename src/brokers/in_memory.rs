//! Synchronous in-process message broker.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use once_cell::sync::Lazy;
use tracing::{debug, error};

use super::{BrokerMessage, ErrorStrategy, MessageBroker, Subscriber};
use crate::environment;

static GLOBAL: Lazy<InMemoryBroker> = Lazy::new(InMemoryBroker::new);

/// Broker that delivers to subscribers on the publishing thread.
#[derive(Default)]
pub struct InMemoryBroker {
    subscribers: Mutex<HashMap<String, Vec<Subscriber>>>,
    on_error: ErrorStrategy,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_strategy(on_error: ErrorStrategy) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            on_error,
        }
    }

    /// Process-wide broker instance.
    pub fn global() -> &'static InMemoryBroker {
        &GLOBAL
    }

    fn handle_failure(&self, channel: &str, failure: anyhow::Error) -> Result<()> {
        // Production logs stay terse; elsewhere include the error chain.
        if environment::is_production() {
            error!(channel, "error delivering message");
        } else {
            error!(channel, error = ?failure, "error delivering message");
        }
        match self.on_error {
            ErrorStrategy::Ignore => Ok(()),
            ErrorStrategy::Raise => Err(failure),
        }
    }
}

impl MessageBroker for InMemoryBroker {
    fn channels(&self) -> Vec<String> {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut channels: Vec<String> = subscribers.keys().cloned().collect();
        channels.sort();
        channels
    }

    fn publish(&self, channel: &str, message: &str) -> Result<()> {
        let message = BrokerMessage::new(message);
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(channel_subscribers) = subscribers.get(channel) else {
            return Ok(());
        };
        for subscriber in channel_subscribers {
            debug!(channel, "delivering message to subscriber");
            if let Err(failure) = subscriber(&message) {
                self.handle_failure(channel, failure)?;
            }
        }
        Ok(())
    }

    fn subscribe(&self, channel: &str, subscriber: Subscriber) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers
            .entry(channel.to_string())
            .or_default()
            .push(subscriber);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_delivers_message_to_channel_subscribers() {
        let broker = InMemoryBroker::new();
        let deliveries = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&deliveries);
        broker.subscribe(
            "orders",
            Box::new(move |message| {
                assert_eq!(message.data, "allocated");
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        broker.publish("orders", "allocated").unwrap();
        assert_eq!(deliveries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_does_not_deliver_to_other_channels() {
        let broker = InMemoryBroker::new();
        let deliveries = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&deliveries);
        broker.subscribe(
            "orders",
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        broker.publish("invoices", "sent").unwrap();
        assert_eq!(deliveries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ignores_subscriber_failure_by_default() {
        let broker = InMemoryBroker::new();
        let deliveries = Arc::new(AtomicUsize::new(0));

        broker.subscribe("orders", Box::new(|_| Err(anyhow!("boom"))));
        let counter = Arc::clone(&deliveries);
        broker.subscribe(
            "orders",
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        broker.publish("orders", "allocated").unwrap();
        assert_eq!(deliveries.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_raises_subscriber_failure_when_configured() {
        let broker = InMemoryBroker::with_error_strategy(ErrorStrategy::Raise);
        broker.subscribe("orders", Box::new(|_| Err(anyhow!("boom"))));
        assert!(broker.publish("orders", "allocated").is_err());
    }

    #[test]
    fn test_channels_lists_subscribed_channels() {
        let broker = InMemoryBroker::new();
        broker.subscribe("orders", Box::new(|_| Ok(())));
        broker.subscribe("invoices", Box::new(|_| Ok(())));
        assert_eq!(broker.channels(), vec!["invoices", "orders"]);
    }

    #[test]
    fn test_global_broker_is_shared() {
        let first = InMemoryBroker::global();
        let second = InMemoryBroker::global();
        assert!(std::ptr::eq(first, second));
    }
}
