//! Names of the process-wide overrides consulted by the event sender.
//!
//! These strings are read by existing override tooling and must not change.

/// Replaces the timestamp of the test-run-started event.
pub const TEST_RUN_STARTED_TIME: &str = "SpecFlow_Messages_TestRunStartedTimeOverride";

/// Replaces the timestamp of every test-case-started event.
pub const TEST_CASE_STARTED_TIME: &str = "SpecFlow_Messages_TestCaseStartedTimeOverride";

/// Replaces the pickle id of every test-case-started event.
pub const TEST_CASE_STARTED_PICKLE_ID: &str = "SpecFlow_Messages_TestCaseStartedPickleIdOverride";

/// Replaces the timestamp of every test-case-finished event.
pub const TEST_CASE_FINISHED_TIME: &str = "SpecFlow_Messages_TestCaseFinishedTimeOverride";

/// Replaces the pickle id of every test-case-finished event.
pub const TEST_CASE_FINISHED_PICKLE_ID: &str = "SpecFlow_Messages_TestCaseFinishedPickleIdOverride";

/// All override keys, in event order.
pub const ALL: [&str; 5] = [
    TEST_RUN_STARTED_TIME,
    TEST_CASE_STARTED_TIME,
    TEST_CASE_STARTED_PICKLE_ID,
    TEST_CASE_FINISHED_TIME,
    TEST_CASE_FINISHED_PICKLE_ID,
];

/// Returns true if `name` is one of the known override keys.
pub fn is_known(name: &str) -> bool {
    ALL.contains(&name)
}
