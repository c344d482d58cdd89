//! Sync cursor handed back and forth between caller and connector

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// "Last successfully completed poll" marker
///
/// Opaque to the caller, who persists it and passes it to the next poll.
/// For GitHub it is an ISO-8601 UTC timestamp used as the `since` filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncCursor(String);

impl SyncCursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Cursor for an instant, formatted the way GitHub expects (`...Z`)
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Cursor for the current time; record it when a poll starts
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SyncCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SyncCursor {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SyncCursor {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
