//! Resolution of the named timestamp and pickle id overrides.
//!
//! An override that is missing or cannot be parsed resolves to `None`, and
//! the caller falls back to the measured or supplied value. A bad override
//! never fails an event.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use cuke_emit_proto::{OverrideProvider, PickleId, Timestamp};
use tracing::{debug, warn};

/// Date-time layouts, tried with and without an offset suffix.
const DATE_TIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// `+hh:mm`, `+hhmm` and `+hh`, attached or after a space.
const OFFSET_SUFFIXES: &[&str] = &["%:z", "%z", "%#z", " %:z", " %z", " %#z"];

/// Date-only layouts, taken as midnight UTC.
const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parses a calendar timestamp and normalizes it to UTC.
///
/// Offset-bearing input is converted to UTC; input without an offset is
/// assumed to be UTC. Returns `None` for anything unrecognizable.
pub fn parse_universal_timestamp(source: &str) -> Option<Timestamp> {
    let source = source.trim();
    if source.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(source) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(source) {
        return Some(parsed.with_timezone(&Utc));
    }

    // A trailing Z is the zero offset
    let with_offset = match source.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => source.to_string(),
    };
    for layout in DATE_TIME_LAYOUTS {
        for suffix in OFFSET_SUFFIXES {
            if let Ok(parsed) = DateTime::parse_from_str(&with_offset, &format!("{layout}{suffix}")) {
                return Some(parsed.with_timezone(&Utc));
            }
        }
    }

    for layout in DATE_TIME_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(source, layout) {
            return Some(naive.and_utc());
        }
    }

    DATE_LAYOUTS.iter().find_map(|layout| {
        NaiveDate::parse_from_str(source, layout)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    })
}

/// Parses any textual pickle id form accepted by [`PickleId`].
pub fn parse_pickle_id(source: &str) -> Option<PickleId> {
    source.parse().ok()
}

/// Looks up overrides by key and parses them.
#[derive(Clone)]
pub struct OverrideResolver {
    provider: Arc<dyn OverrideProvider>,
}

impl OverrideResolver {
    pub fn new(provider: Arc<dyn OverrideProvider>) -> Self {
        Self { provider }
    }

    /// Returns the UTC timestamp stored under `name`, if set and parsable.
    pub fn resolve_timestamp(&self, name: &str) -> Option<Timestamp> {
        let raw = self.provider.get(name)?;
        match parse_universal_timestamp(&raw) {
            Some(timestamp) => {
                debug!(key = name, %timestamp, "Applying timestamp override");
                Some(timestamp)
            }
            None => {
                warn!(key = name, value = %raw, "Ignoring unparsable timestamp override");
                None
            }
        }
    }

    /// Returns the pickle id stored under `name`, if set and parsable.
    pub fn resolve_identifier(&self, name: &str) -> Option<PickleId> {
        let raw = self.provider.get(name)?;
        match parse_pickle_id(&raw) {
            Some(pickle_id) => {
                debug!(key = name, %pickle_id, "Applying pickle id override");
                Some(pickle_id)
            }
            None => {
                warn!(key = name, value = %raw, "Ignoring unparsable pickle id override");
                None
            }
        }
    }
}

impl fmt::Debug for OverrideResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideResolver").finish_non_exhaustive()
    }
}
