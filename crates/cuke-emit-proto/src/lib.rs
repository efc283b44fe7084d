//! # cuke-emit-proto
//!
//! Shared types and collaborator traits for cuke-emit.
//!
//! This crate provides:
//! - `Timestamp` and `PickleId`, the values every lifecycle event carries
//! - `TestOutcome`, the result of a finished test case
//! - `BuildResult`, the tagged outcome of message construction
//! - The collaborator traits the event sender is composed from
//!   (`Clock`, `MessageFactory`, `MessageSink`, `OverrideProvider`)
//! - The fixed override key names

mod build_result;
mod collaborators;
pub mod override_keys;
mod outcome;
mod pickle;

pub use build_result::{BoxError, BuildResult, WrappedFailure};
pub use collaborators::{Clock, MessageFactory, MessageSink, OverrideProvider};
pub use outcome::{TestOutcome, TestStatus};
pub use pickle::{ParsePickleIdError, PickleId};

/// An instant, always normalized to UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
