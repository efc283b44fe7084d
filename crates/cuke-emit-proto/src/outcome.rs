//! Test case outcomes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Final status of a test case, using the Cucumber status names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    #[default]
    Unknown,
    Passed,
    Skipped,
    Pending,
    Undefined,
    Ambiguous,
    Failed,
}

/// The result of a finished test case.
///
/// The event sender never inspects this value; it only hands it to the
/// message factory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestOutcome {
    pub status: TestStatus,
    /// Diagnostic detail, typically the failure message.
    pub message: Option<String>,
    pub duration: Duration,
}

impl TestOutcome {
    pub fn new(status: TestStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn passed() -> Self {
        Self::new(TestStatus::Passed)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(TestStatus::Failed).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}
