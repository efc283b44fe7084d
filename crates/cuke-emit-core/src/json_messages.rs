//! Cucumber-style JSON messages and the factory that builds them.
//!
//! Each envelope serializes to a single externally tagged object, e.g.
//! `{"testCaseStarted":{"pickleId":"...","timestamp":{"seconds":1,"nanos":0}}}`.

use std::time::Duration;

use cuke_emit_proto::{
    BuildResult, MessageFactory, PickleId, TestOutcome, TestStatus, Timestamp, WrappedFailure,
};
use serde::{Deserialize, Serialize};

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTimestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl WireTimestamp {
    /// Returns `None` for instants before the Unix epoch.
    fn from_timestamp(timestamp: Timestamp) -> Option<Self> {
        let seconds = timestamp.timestamp();
        (seconds >= 0).then(|| Self {
            seconds,
            nanos: timestamp.timestamp_subsec_nanos(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDuration {
    pub seconds: i64,
    pub nanos: u32,
}

impl WireDuration {
    fn from_duration(duration: Duration) -> Option<Self> {
        Some(Self {
            seconds: i64::try_from(duration.as_secs()).ok()?,
            nanos: duration.subsec_nanos(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunStarted {
    pub timestamp: WireTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseStarted {
    pub pickle_id: PickleId,
    pub timestamp: WireTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration: WireDuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseFinished {
    pub pickle_id: PickleId,
    pub timestamp: WireTimestamp,
    pub test_result: TestResult,
}

/// A single lifecycle message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Message {
    TestRunStarted(TestRunStarted),
    TestCaseStarted(TestCaseStarted),
    TestCaseFinished(TestCaseFinished),
}

impl Message {
    /// The message name as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::TestRunStarted(_) => "testRunStarted",
            Message::TestCaseStarted(_) => "testCaseStarted",
            Message::TestCaseFinished(_) => "testCaseFinished",
        }
    }
}

/// The wrapper every message travels in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope {
    message: Message,
}

impl Envelope {
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn into_message(self) -> Message {
        self.message
    }
}

/// Builds [`Message`]s and [`Envelope`]s.
///
/// Pickle ids must not be nil and timestamps must not precede the Unix
/// epoch; violations are reported as failures rather than encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMessageFactory;

impl JsonMessageFactory {
    fn wire_timestamp(kind: &str, timestamp: Timestamp) -> Result<WireTimestamp, WrappedFailure> {
        WireTimestamp::from_timestamp(timestamp).ok_or_else(|| {
            WrappedFailure::new(kind, format!("{timestamp} is before the Unix epoch"))
                .with_field("timestamp")
        })
    }

    fn check_pickle_id(pickle_id: PickleId) -> Result<PickleId, String> {
        if pickle_id.is_nil() {
            Err("pickle id must not be nil".to_string())
        } else {
            Ok(pickle_id)
        }
    }
}

impl MessageFactory for JsonMessageFactory {
    type Message = Message;
    type Envelope = Envelope;
    type Outcome = TestOutcome;

    fn build_run_started(&self, timestamp: Timestamp) -> BuildResult<Message> {
        match Self::wire_timestamp("testRunStarted", timestamp) {
            Ok(timestamp) => BuildResult::Success(Message::TestRunStarted(TestRunStarted { timestamp })),
            Err(failure) => BuildResult::WrappedFailure(failure),
        }
    }

    fn build_case_started(&self, pickle_id: PickleId, timestamp: Timestamp) -> BuildResult<Message> {
        let pickle_id = match Self::check_pickle_id(pickle_id) {
            Ok(id) => id,
            Err(description) => return BuildResult::Failure(description),
        };
        match Self::wire_timestamp("testCaseStarted", timestamp) {
            Ok(timestamp) => BuildResult::Success(Message::TestCaseStarted(TestCaseStarted {
                pickle_id,
                timestamp,
            })),
            Err(failure) => BuildResult::WrappedFailure(failure),
        }
    }

    fn build_case_finished(
        &self,
        pickle_id: PickleId,
        timestamp: Timestamp,
        outcome: &TestOutcome,
    ) -> BuildResult<Message> {
        let pickle_id = match Self::check_pickle_id(pickle_id) {
            Ok(id) => id,
            Err(description) => return BuildResult::Failure(description),
        };
        let timestamp = match Self::wire_timestamp("testCaseFinished", timestamp) {
            Ok(timestamp) => timestamp,
            Err(failure) => return BuildResult::WrappedFailure(failure),
        };
        let Some(duration) = WireDuration::from_duration(outcome.duration) else {
            return BuildResult::WrappedFailure(
                WrappedFailure::new("testCaseFinished", "duration does not fit in i64 seconds")
                    .with_field("testResult.duration"),
            );
        };

        BuildResult::Success(Message::TestCaseFinished(TestCaseFinished {
            pickle_id,
            timestamp,
            test_result: TestResult {
                status: outcome.status,
                message: outcome.message.clone(),
                duration,
            },
        }))
    }

    fn build_envelope(&self, message: Message) -> BuildResult<Envelope> {
        // Sinks serialize later and cannot report errors, so check it here
        if let Err(error) = serde_json::to_value(&message) {
            return BuildResult::ExceptionFailure(Box::new(error));
        }
        BuildResult::Success(Envelope { message })
    }
}
