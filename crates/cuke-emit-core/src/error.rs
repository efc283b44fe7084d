//! Errors raised when an event cannot be sent.

use cuke_emit_proto::{BoxError, WrappedFailure};
use thiserror::Error;

/// Why an event never reached the sink.
///
/// Each variant corresponds to one non-success shape of
/// [`BuildResult`](cuke_emit_proto::BuildResult).
#[derive(Debug, Error)]
pub enum SendError {
    /// The factory described the failure structurally.
    #[error("the message could not be created. {0}")]
    Wrapped(WrappedFailure),

    /// The factory's own error, passed through unchanged.
    #[error(transparent)]
    Exception(BoxError),

    /// The factory described the failure in free text.
    #[error("the message could not be created. {0}")]
    Failure(String),

    /// The factory returned a result shape this sender does not know.
    #[error("the message could not be created")]
    Unrecognized,
}

impl SendError {
    /// Returns the factory's original error, if this is the exception case.
    pub fn into_cause(self) -> Option<BoxError> {
        match self {
            Self::Exception(cause) => Some(cause),
            _ => None,
        }
    }
}
