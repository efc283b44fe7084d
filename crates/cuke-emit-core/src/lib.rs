//! # cuke-emit-core
//!
//! Lifecycle event sending for cuke-emit.
//!
//! This crate provides:
//! - The event sender that resolves overrides, builds messages and
//!   dispatches envelopes
//! - Override resolution with best-effort timestamp and pickle id parsing
//! - Default collaborators: clocks, a Cucumber-style JSON message factory,
//!   NDJSON, in-memory and channel sinks, and override providers
//! - YAML configuration for the emitter

mod clock;
mod config;
mod error;
mod event_sender;
pub mod json_messages;
mod override_resolver;
mod override_sources;
mod sinks;

pub use clock::{FixedClock, SystemClock};
pub use config::{ConfigError, EmitConfig, parse_override_assignment};
pub use error::SendError;
pub use event_sender::EventSender;
pub use json_messages::{Envelope, JsonMessageFactory, Message};
pub use override_resolver::{OverrideResolver, parse_pickle_id, parse_universal_timestamp};
pub use override_sources::{EnvOverrides, LayeredOverrides, MapOverrides};
pub use sinks::{ChannelSink, MemorySink, NdjsonSink};
