//! Standard task schema for task source integrations
//!
//! The aggregator works on a single normalized task shape regardless of where a
//! task came from. Connectors produce [`StandardTask`] values and accept
//! [`ChangeSet`] patches expressed in standard field names.
//!
//! # Example
//!
//! ```
//! use standard_task::{ChangeSet, TaskStatus};
//!
//! let changes = ChangeSet::new()
//!     .with_name("Ship the release")
//!     .with_status(TaskStatus::Done);
//!
//! assert!(!changes.is_empty());
//! assert_eq!(changes.status, Some(TaskStatus::Done));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while interpreting standard task values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown task status: {0}")]
    UnknownStatus(String),
}

/// Completion status of a standard task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Done,
    NotDone,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Done => write!(f, "DONE"),
            TaskStatus::NotDone => write!(f, "NOT_DONE"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "done" => Ok(TaskStatus::Done),
            "not_done" => Ok(TaskStatus::NotDone),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

/// A normalized task as seen by the aggregator
///
/// `id` and `project_id` are assigned by the aggregator; connectors leave
/// them empty. `raw_data` holds the source payload the task was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardTask {
    pub id: String,
    pub project_id: String,
    /// Connector-specific identifier, stable across polls
    pub source_id: String,
    /// Identifier of the connector that produced the task
    pub source_name: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub raw_data: serde_json::Value,
}

/// A partial update expressed in standard task field names
///
/// Keys a connector does not understand are kept in `other` and ignored,
/// so older connectors accept patches written for newer schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `Some(None)` clears the description; `None` leaves it untouched
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Distinguishes an explicit `null` from a missing key
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// True when no field at all was supplied, recognized or not
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.other.is_empty()
    }
}
