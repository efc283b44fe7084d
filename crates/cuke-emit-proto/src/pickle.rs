//! Pickle identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifies a single executable instance of a test scenario.
///
/// Comparable for equality only; pickle ids carry no ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PickleId(Uuid);

/// Error returned when text is not a valid pickle id.
#[derive(Debug, Error)]
#[error("invalid pickle id '{input}': {source}")]
pub struct ParsePickleIdError {
    input: String,
    #[source]
    source: uuid::Error,
}

impl PickleId {
    /// Generates a fresh random pickle id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The all-zero id.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

/// Accepts hyphenated, simple (32 hex digits), braced and urn forms.
impl FromStr for PickleId {
    type Err = ParsePickleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|source| ParsePickleIdError {
                input: s.to_string(),
                source,
            })
    }
}

impl fmt::Display for PickleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
