//! Message broker that delivers on worker threads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::Result;
use tracing::{debug, error};

use super::{BrokerMessage, MessageBroker, Subscriber};

struct SubscriberSlot {
    callback: Subscriber,
    // One lock per subscriber: deliveries to the same subscriber are
    // serialized, deliveries to different subscribers are not.
    serialize: Mutex<()>,
}

/// Broker that fans out on worker threads so a slow subscriber never blocks
/// its peers. Failures are logged and skipped.
#[derive(Default)]
pub struct ThreadedBroker {
    subscribers: Mutex<HashMap<String, Vec<Arc<SubscriberSlot>>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl ThreadedBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until every delivery spawned so far has finished.
    pub fn wait(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut guard = self
                .handles
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                error!("delivery thread panicked");
            }
        }
    }
}

impl MessageBroker for ThreadedBroker {
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
        let slots: Vec<Arc<SubscriberSlot>> = {
            let subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            subscribers.get(channel).cloned().unwrap_or_default()
        };

        let mut handles = self
            .handles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for slot in slots {
            let message = BrokerMessage::new(message);
            let channel = channel.to_string();
            debug!(%channel, "spawning delivery");
            handles.push(thread::spawn(move || {
                let _serialized = slot
                    .serialize
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Err(failure) = (slot.callback)(&message) {
                    error!(%channel, error = ?failure, "error delivering message");
                }
            }));
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
            .push(Arc::new(SubscriberSlot {
                callback: subscriber,
                serialize: Mutex::new(()),
            }));
    }
}
