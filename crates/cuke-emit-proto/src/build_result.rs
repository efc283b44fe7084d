//! Tagged outcome of message construction.

use std::fmt;

/// Boxed causal error carried by [`BuildResult::ExceptionFailure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a message factory operation.
///
/// Factories report failures as values instead of panicking. The event
/// sender turns every variant other than `Success` into an error, so new
/// variants may be added here; match with a wildcard arm.
#[derive(Debug)]
#[non_exhaustive]
pub enum BuildResult<T> {
    /// The value was built.
    Success(T),
    /// A structured description of what went wrong, with no causal error.
    WrappedFailure(WrappedFailure),
    /// A causal error that must reach the caller unchanged.
    ExceptionFailure(BoxError),
    /// A free-text description of what went wrong.
    Failure(String),
    /// The factory could not classify its own result.
    Unrecognized,
}

impl<T> BuildResult<T> {
    /// Feeds a successful value into the next build stage.
    ///
    /// Failures pass through untouched, only their success type changes.
    pub fn and_then<U>(self, next: impl FnOnce(T) -> BuildResult<U>) -> BuildResult<U> {
        match self {
            Self::Success(value) => next(value),
            Self::WrappedFailure(failure) => BuildResult::WrappedFailure(failure),
            Self::ExceptionFailure(error) => BuildResult::ExceptionFailure(error),
            Self::Failure(description) => BuildResult::Failure(description),
            Self::Unrecognized => BuildResult::Unrecognized,
        }
    }

    /// Converts the success value, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BuildResult<U> {
        self.and_then(|value| BuildResult::Success(f(value)))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Structured description of a message that could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedFailure {
    /// Message kind being built, e.g. `testCaseStarted`.
    pub message: String,
    /// Field that failed validation, if one can be singled out.
    pub field: Option<String>,
    pub reason: String,
}

impl WrappedFailure {
    pub fn new(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
            reason: reason.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for WrappedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "WrappedFailure {{ message: {}, field: {}, reason: {} }}",
                self.message, field, self.reason
            ),
            None => write!(
                f,
                "WrappedFailure {{ message: {}, reason: {} }}",
                self.message, self.reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_then_chains_success() {
        let result = BuildResult::Success(2).and_then(|n| BuildResult::Success(n * 10));
        assert_eq!(result.ok(), Some(20));
    }

    #[test]
    fn test_and_then_skips_next_stage_on_failure() {
        let mut called = false;
        let result: BuildResult<u32> = BuildResult::<u32>::Failure("bad input".into()).and_then(|n| {
            called = true;
            BuildResult::Success(n)
        });

        assert!(!called);
        match result {
            BuildResult::Failure(description) => assert_eq!(description, "bad input"),
            other => panic!("Expected Failure, got {other:?}"),
        }
    }

    #[test]
    fn test_and_then_keeps_causal_error() {
        let cause: BoxError = Box::new(std::io::Error::other("disk on fire"));
        let result = BuildResult::<()>::ExceptionFailure(cause).map(|()| 1);
        match result {
            BuildResult::ExceptionFailure(error) => {
                let io = error.downcast_ref::<std::io::Error>().unwrap();
                assert_eq!(io.to_string(), "disk on fire");
            }
            other => panic!("Expected ExceptionFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_and_then_keeps_wrapped_and_unrecognized() {
        let wrapped = WrappedFailure::new("testRunStarted", "out of range").with_field("timestamp");
        let result = BuildResult::<()>::WrappedFailure(wrapped.clone()).map(|()| 1);
        assert!(matches!(result, BuildResult::WrappedFailure(ref f) if *f == wrapped));

        let result = BuildResult::<()>::Unrecognized.map(|()| 1);
        assert!(matches!(result, BuildResult::Unrecognized));
    }

    #[test]
    fn test_wrapped_failure_display_includes_every_field() {
        let failure = WrappedFailure::new("testCaseFinished", "before the unix epoch").with_field("timestamp");
        let text = failure.to_string();
        assert!(text.contains("testCaseFinished"));
        assert!(text.contains("timestamp"));
        assert!(text.contains("before the unix epoch"));

        let text = WrappedFailure::new("envelope", "empty").to_string();
        assert_eq!(text, "WrappedFailure { message: envelope, reason: empty }");
    }
}
