//! # Dodecahedron
//!
//! Building blocks for domain-driven design and hexagonal architecture:
//! message buses, repositories, units of work and the adapters that connect
//! a domain model to files, databases and external brokers.
//!
//! ## Core Concepts
//!
//! - **Messages**: commands carry an intent and go to exactly one handler;
//!   events are broadcast to every subscribed handler
//! - **Repositories**: collections of aggregates with pluggable storage
//!   (in-memory, CSV, TXT, XLSX, SQL)
//! - **Units of work**: atomic boundaries around repository work, and the
//!   place domain events are harvested from between messages
//!
//! ## Modules
//!
//! - [`messagebus`] - Command and event delivery
//! - [`messages`] / [`queue`] - Message traits and the ordered queue
//! - [`models`] - Model and aggregate traits, package model
//! - [`repositories`] - Repository trait and file/database backends
//! - [`units_of_work`] - Unit-of-work trait and implementations
//! - [`brokers`] / [`pubsub`] - In-process fan-out and external pub/sub
//! - [`wrappers`] - File wrappers behind the file-backed repositories
//! - [`converters`] / [`mappers`] / [`parsers`] - Value normalization
//! - [`cli`] - Command-line driving adapter
//! - [`testing`] - Fakes for downstream test suites
//!
//! ## Example
//!
//! ```
//! use std::any::Any;
//! use anyhow::Result;
//! use chrono::{DateTime, Utc};
//!
//! use dodecahedron::messages::{Message, MessageKind, Stamp};
//! use dodecahedron::units_of_work::EventfulUnitOfWork;
//! use dodecahedron::MessageBus;
//!
//! struct AllocateOrder {
//!     stamp: Stamp,
//!     order_id: String,
//! }
//!
//! impl Message for AllocateOrder {
//!     fn kind(&self) -> MessageKind {
//!         MessageKind::Command
//!     }
//!
//!     fn created_at(&self) -> DateTime<Utc> {
//!         self.stamp.time()
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "AllocateOrder"
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut bus = MessageBus::new(EventfulUnitOfWork::new());
//! bus.subscribe_command(|command: &AllocateOrder, _uow| {
//!     assert_eq!(command.order_id, "o-1");
//!     Ok(())
//! });
//! bus.handle(Box::new(AllocateOrder {
//!     stamp: Stamp::now(),
//!     order_id: "o-1".to_string(),
//! }))?;
//! # Ok(())
//! # }
//! ```

pub mod brokers;
pub mod cli;
pub mod converters;
pub mod dispatchers;
pub mod environment;
pub mod errors;
pub mod json;
pub mod mappers;
pub mod messagebus;
pub mod messages;
pub mod models;
pub mod parsers;
#[cfg(feature = "progress")]
pub mod progress;
pub mod pubsub;
pub mod queue;
pub mod repositories;
pub mod settings;
pub mod testing;
pub mod units_of_work;
pub mod utils;
pub mod wrappers;

pub use errors::Error;
pub use messagebus::MessageBus;
pub use messages::{Message, MessageKind, Stamp};
pub use queue::MessageQueue;
pub use units_of_work::{UnitOfWork, UnitOfWorkExt};

/// Version of the dodecahedron crate, sourced from the manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
