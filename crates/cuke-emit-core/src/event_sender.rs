//! The event sender: resolves overrides, builds messages, and dispatches
//! envelopes to the sink.

use std::fmt;
use std::sync::Arc;

use cuke_emit_proto::{
    BuildResult, Clock, MessageFactory, MessageSink, OverrideProvider, PickleId, Timestamp,
    override_keys,
};
use tracing::debug;

use crate::error::SendError;
use crate::override_resolver::OverrideResolver;

/// Sends test run lifecycle events.
///
/// Each operation resolves its own override keys, so the started and
/// finished events can be overridden independently. Overrides are not
/// per case: a set override applies to every call for that event kind.
///
/// An event either reaches the sink as a complete envelope or the call
/// returns an error and nothing is sent. Failed sends are not retried.
pub struct EventSender<F: MessageFactory> {
    clock: Arc<dyn Clock>,
    factory: Arc<F>,
    sink: Arc<dyn MessageSink<F::Envelope>>,
    overrides: OverrideResolver,
}

impl<F: MessageFactory> EventSender<F> {
    pub fn new(
        clock: Arc<dyn Clock>,
        factory: Arc<F>,
        sink: Arc<dyn MessageSink<F::Envelope>>,
        overrides: Arc<dyn OverrideProvider>,
    ) -> Self {
        Self {
            clock,
            factory,
            sink,
            overrides: OverrideResolver::new(overrides),
        }
    }

    pub fn send_run_started(&self) -> Result<(), SendError> {
        let timestamp = self.timestamp_or_now(override_keys::TEST_RUN_STARTED_TIME);

        let envelope = self
            .factory
            .build_run_started(timestamp)
            .and_then(|message| self.factory.build_envelope(message));
        self.dispatch(envelope)?;

        debug!(%timestamp, "Sent testRunStarted");
        Ok(())
    }

    /// Sends testCaseStarted; a pickle id override replaces `pickle_id`.
    pub fn send_case_started(&self, pickle_id: PickleId) -> Result<(), SendError> {
        let pickle_id = self
            .overrides
            .resolve_identifier(override_keys::TEST_CASE_STARTED_PICKLE_ID)
            .unwrap_or(pickle_id);
        let timestamp = self.timestamp_or_now(override_keys::TEST_CASE_STARTED_TIME);

        let envelope = self
            .factory
            .build_case_started(pickle_id, timestamp)
            .and_then(|message| self.factory.build_envelope(message));
        self.dispatch(envelope)?;

        debug!(%pickle_id, %timestamp, "Sent testCaseStarted");
        Ok(())
    }

    /// Sends testCaseFinished; a pickle id override replaces `pickle_id`.
    pub fn send_case_finished(
        &self,
        pickle_id: PickleId,
        outcome: &F::Outcome,
    ) -> Result<(), SendError> {
        let pickle_id = self
            .overrides
            .resolve_identifier(override_keys::TEST_CASE_FINISHED_PICKLE_ID)
            .unwrap_or(pickle_id);
        let timestamp = self.timestamp_or_now(override_keys::TEST_CASE_FINISHED_TIME);

        let envelope = self
            .factory
            .build_case_finished(pickle_id, timestamp, outcome)
            .and_then(|message| self.factory.build_envelope(message));
        self.dispatch(envelope)?;

        debug!(%pickle_id, %timestamp, "Sent testCaseFinished");
        Ok(())
    }

    fn timestamp_or_now(&self, key: &str) -> Timestamp {
        self.overrides
            .resolve_timestamp(key)
            .unwrap_or_else(|| self.clock.now())
    }

    fn dispatch(&self, result: BuildResult<F::Envelope>) -> Result<(), SendError> {
        match result {
            BuildResult::Success(envelope) => {
                self.sink.send(envelope);
                Ok(())
            }
            BuildResult::WrappedFailure(failure) => Err(SendError::Wrapped(failure)),
            BuildResult::ExceptionFailure(cause) => Err(SendError::Exception(cause)),
            BuildResult::Failure(description) => Err(SendError::Failure(description)),
            _ => Err(SendError::Unrecognized),
        }
    }
}

impl<F: MessageFactory> fmt::Debug for EventSender<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSender")
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
