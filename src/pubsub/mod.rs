//! Publish/subscribe integration with external brokers.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "redis")]
pub use self::redis::{RedisListener, RedisPublisher};

/// Publishes events to an external message broker.
pub trait Publisher {
    /// Send an already-serialized payload on a channel.
    fn publish_payload(&mut self, channel: &str, payload: &str) -> Result<()>;

    /// Serialize an event as JSON and publish it on a channel.
    fn publish<E: Serialize>(&mut self, channel: &str, event: &E) -> Result<()>
    where
        Self: Sized,
    {
        let payload = serde_json::to_string(event)?;
        info!(channel, "publishing event");
        self.publish_payload(channel, &payload)
    }
}

/// Receives payloads from an external broker on a background thread.
pub trait Listener {
    /// Start listening.
    fn start(&mut self) -> Result<()>;

    /// Stop listening.
    fn stop(&mut self) -> Result<()>;
}

/// Callback invoked for every payload received on a subscribed channel.
pub type ChannelCallback = Box<dyn Fn(&str) + Send + 'static>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct OrderAllocated {
        order_id: String,
    }

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Vec<(String, String)>,
    }

    impl Publisher for RecordingPublisher {
        fn publish_payload(&mut self, channel: &str, payload: &str) -> Result<()> {
            self.sent.push((channel.to_string(), payload.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_publish_serializes_event_as_json() {
        let mut publisher = RecordingPublisher::default();
        publisher
            .publish(
                "orders",
                &OrderAllocated {
                    order_id: "o-1".to_string(),
                },
            )
            .unwrap();

        let (channel, payload) = &publisher.sent[0];
        assert_eq!(channel, "orders");
        assert_eq!(payload, r#"{"order_id":"o-1"}"#);
    }
}
