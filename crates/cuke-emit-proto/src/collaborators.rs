//! Traits for the collaborators an event sender is composed from.
//!
//! The sender never constructs these; callers hand them in already built
//! and shared. All of them are synchronous from the sender's point of view.

use crate::{BuildResult, PickleId, Timestamp};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant, normalized to UTC.
    fn now(&self) -> Timestamp;
}

/// Builds lifecycle messages and wraps them into envelopes.
pub trait MessageFactory: Send + Sync {
    type Message;
    type Envelope;
    /// Opaque per-case result handed through to `build_case_finished`.
    type Outcome;

    fn build_run_started(&self, timestamp: Timestamp) -> BuildResult<Self::Message>;

    fn build_case_started(
        &self,
        pickle_id: PickleId,
        timestamp: Timestamp,
    ) -> BuildResult<Self::Message>;

    fn build_case_finished(
        &self,
        pickle_id: PickleId,
        timestamp: Timestamp,
        outcome: &Self::Outcome,
    ) -> BuildResult<Self::Message>;

    fn build_envelope(&self, message: Self::Message) -> BuildResult<Self::Envelope>;
}

/// Accepts built envelopes for delivery.
///
/// Delivery problems are the sink's own business; `send` never reports them.
pub trait MessageSink<E>: Send + Sync {
    fn send(&self, envelope: E);
}

/// Read-only lookup of named override values.
pub trait OverrideProvider: Send + Sync {
    /// Returns the raw value for `name`, or `None` if it is not set.
    fn get(&self, name: &str) -> Option<String>;
}
