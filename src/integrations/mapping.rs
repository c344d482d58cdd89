//! Mapping between GitHub issues and standard tasks
//!
//! Both directions are pure functions: no I/O, no clock, same input gives the
//! same output.

use super::ids::RepoRef;
use super::record::{RemoteIssue, UpdateIssueRequest};
use crate::{Result, SyncError};
use chrono::{DateTime, Utc};
use standard_task::{ChangeSet, StandardTask, TaskStatus};

/// `source_name` of every task this connector produces
pub const SOURCE_NAME: &str = "github";

/// Status of a task given the issue `state`: only "closed" means done
pub fn status_from_state(state: Option<&str>) -> TaskStatus {
    match state {
        Some("closed") => TaskStatus::Done,
        _ => TaskStatus::NotDone,
    }
}

/// Inverse of [`status_from_state`]
pub fn state_from_status(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Done => "closed",
        TaskStatus::NotDone => "open",
    }
}

fn parse_timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    SyncError::InvalidRecord(format!("bad '{}' timestamp {:?}: {}", field, raw, e))
                })
        })
        .transpose()
}

/// Convert a GitHub issue into a standard task
///
/// Fails with `InvalidRecord` when the payload is empty, has no positive
/// `number`, or carries a timestamp that is not RFC 3339.
pub fn to_standard_task(issue: &RemoteIssue, repo: &RepoRef) -> Result<StandardTask> {
    if issue.is_empty() {
        return Err(SyncError::InvalidRecord(
            "cannot map empty GitHub issue payload".to_string(),
        ));
    }
    let number = issue.number().ok_or_else(|| {
        SyncError::InvalidRecord("GitHub issue payload missing 'number'".to_string())
    })?;

    let created_at = parse_timestamp("created_at", issue.created_at())?;
    let updated_at = parse_timestamp("updated_at", issue.updated_at())?;

    Ok(StandardTask {
        id: String::new(),
        project_id: String::new(),
        source_id: repo.issue(number).to_string(),
        source_name: SOURCE_NAME.to_string(),
        name: issue.title().unwrap_or_default().to_string(),
        description: issue.body().map(str::to_string),
        url: issue.html_url().map(str::to_string),
        status: status_from_state(issue.state()),
        // Issues have no due date field
        due_date: None,
        created_at,
        updated_at,
        raw_data: issue.raw().clone(),
    })
}

/// Build the PATCH payload for a change set
///
/// Only `name`, `description` and `status` reach GitHub. A description
/// replaces the whole issue body; it is never merged. An empty result means
/// nothing in `changes` is writable.
pub fn to_remote_payload(changes: &ChangeSet) -> UpdateIssueRequest {
    UpdateIssueRequest {
        title: changes.name.clone(),
        body: changes.description.clone(),
        state: changes
            .status
            .map(|status| state_from_status(status).to_string()),
    }
}
