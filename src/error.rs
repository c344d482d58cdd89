//! Error types for issuesync
//!
//! One enum covers the connector taxonomy (bad ids, bad records, remote
//! failures) plus the ambient failures of config loading and transport.

use thiserror::Error;

/// Result type alias for issuesync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error type for issuesync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// External id does not match `owner/repo/number`
    #[error("Invalid issue id '{0}': expected 'owner/repo/number'")]
    InvalidId(String),

    /// Remote payload is empty or lacks a required field
    #[error("Invalid remote record: {0}")]
    InvalidRecord(String),

    /// Remote answered 404
    #[error("Remote record not found: {0}")]
    RemoteNotFound(String),

    /// Remote answered with any other non-success status
    #[error("Remote request failed: HTTP {status}{}", body.as_deref().map(|b| format!(": {}", b)).unwrap_or_default())]
    RemoteRequestFailed { status: u16, body: Option<String> },

    /// A record could not be mapped while polling
    #[error("Failed to map {record}: {source}")]
    MappingFailed {
        record: String,
        #[source]
        source: Box<SyncError>,
    },

    /// Update fell back to a read and the task does not exist
    #[error("Task {0} not found in GitHub for update")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file does not exist
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(std::path::PathBuf),

    /// Transport-level failures that are not HTTP statuses
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SyncError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::RemoteRequestFailed { status, .. } => Some(*status),
            SyncError::RemoteNotFound(_) => Some(404),
            SyncError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for the not-found conditions of both reads and updates
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::RemoteNotFound(_) | SyncError::NotFound(_))
    }
}
