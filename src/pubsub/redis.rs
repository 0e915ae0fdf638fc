//! Redis publisher and listener.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use redis::Commands;
use tracing::{debug, error};

use super::{ChannelCallback, Listener, Publisher};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Publisher over a blocking Redis connection.
pub struct RedisPublisher {
    connection: redis::Connection,
}

impl RedisPublisher {
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("invalid redis url")?;
        let connection = client
            .get_connection()
            .context("unable to connect to redis")?;
        Ok(Self { connection })
    }
}

impl Publisher for RedisPublisher {
    fn publish_payload(&mut self, channel: &str, payload: &str) -> Result<()> {
        let _: () = self
            .connection
            .publish(channel, payload)
            .with_context(|| format!("failed to publish on '{}'", channel))?;
        Ok(())
    }
}

type CallbackMap = Arc<Mutex<HashMap<String, Vec<ChannelCallback>>>>;

/// Listener polling Redis pub/sub on a background thread.
///
/// Channels are subscribed up front; `start` spawns the poll loop and
/// `stop` shuts it down and joins the thread.
pub struct RedisListener {
    client: redis::Client,
    callbacks: CallbackMap,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RedisListener {
    pub fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).context("invalid redis url")?;
        Ok(Self {
            client,
            callbacks: Arc::new(Mutex::new(HashMap::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
            handle: None,
        })
    }

    /// Register a callback for a channel. Takes effect on the next `start`.
    pub fn subscribe(&mut self, channel: &str, callback: impl Fn(&str) + Send + 'static) {
        let mut callbacks = self
            .callbacks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        callbacks
            .entry(channel.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    fn run(
        mut connection: redis::Connection,
        channels: Vec<String>,
        callbacks: CallbackMap,
        shutdown: Arc<AtomicBool>,
    ) {
        let mut pubsub = connection.as_pubsub();
        for channel in &channels {
            if let Err(failure) = pubsub.subscribe(channel) {
                error!(%channel, error = %failure, "failed to subscribe");
                return;
            }
        }
        if let Err(failure) = pubsub.set_read_timeout(Some(POLL_INTERVAL)) {
            error!(error = %failure, "failed to configure pubsub polling");
            return;
        }

        while !shutdown.load(Ordering::SeqCst) {
            let message = match pubsub.get_message() {
                Ok(message) => message,
                // Read timeouts keep the loop responsive to shutdown.
                Err(_) => continue,
            };
            let channel = message.get_channel_name().to_string();
            let payload: String = match message.get_payload() {
                Ok(payload) => payload,
                Err(failure) => {
                    error!(%channel, error = %failure, "failed to decode payload");
                    continue;
                }
            };
            debug!(%channel, "received message");
            let callbacks = callbacks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(channel_callbacks) = callbacks.get(&channel) {
                for callback in channel_callbacks {
                    callback(&payload);
                }
            }
        }
    }
}

impl Listener for RedisListener {
    fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let connection = self
            .client
            .get_connection()
            .context("unable to connect to redis")?;
        let channels: Vec<String> = {
            let callbacks = self
                .callbacks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            callbacks.keys().cloned().collect()
        };
        let callbacks = Arc::clone(&self.callbacks);
        let shutdown = Arc::clone(&self.shutdown);
        shutdown.store(false, Ordering::SeqCst);

        self.handle = Some(thread::spawn(move || {
            Self::run(connection, channels, callbacks, shutdown);
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("listener thread panicked");
            }
        }
        Ok(())
    }
}

impl Drop for RedisListener {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
