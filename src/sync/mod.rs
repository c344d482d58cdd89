//! Synchronization engine
//!
//! The [`GitHubConnector`] polls configured repositories and pushes edits
//! back to GitHub.
//!
//! # Poll Cycle
//!
//! 1. Caller records [`SyncCursor::now`] and passes the previous cursor
//! 2. Each repository is listed in turn, oldest update first
//! 3. Each issue is mapped to a standard task or skipped with a reason
//! 4. Caller persists the recorded cursor after draining the stream
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use issuesync::config::ConnectorConfig;
//! use issuesync::sync::{GitHubConnector, SyncCursor};
//!
//! # async fn run(previous: Option<SyncCursor>) -> issuesync::Result<SyncCursor> {
//! let config = ConnectorConfig::load_default()?;
//! let connector = GitHubConnector::from_config(&config)?;
//!
//! let next_cursor = SyncCursor::now();
//! let tasks: Vec<_> = connector.poll_changes(previous.as_ref()).collect().await;
//! println!("{} tasks changed", tasks.len());
//!
//! connector.close().await;
//! Ok(next_cursor)
//! # }
//! ```

mod connector;
mod cursor;
mod outcome;

pub use connector::GitHubConnector;
pub use cursor::SyncCursor;
pub use outcome::{PollOutcome, PollStats, SkipReason};
