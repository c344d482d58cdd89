//! GitHub task source connector
//!
//! Facade the aggregator talks to: fetch one task, push a change set, and
//! poll every configured repository for tasks updated since a cursor.

use super::cursor::SyncCursor;
use super::outcome::{PollOutcome, SkipReason};
use crate::config::ConnectorConfig;
use crate::integrations::{
    to_remote_payload, to_standard_task, GitHubClient, IssueRef, RemoteIssue, RepoRef,
    ReqwestTransport, Transport,
};
use crate::{Result, SyncError};
use async_stream::stream;
use futures::{future, pin_mut, Stream, StreamExt};
use standard_task::{ChangeSet, StandardTask};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Issue state filter used when polling
const POLL_STATE: &str = "all";

/// Connector between GitHub Issues and standard tasks
///
/// Owns the transport for its whole life; [`GitHubConnector::close`]
/// consumes the connector, so the transport is released exactly once.
pub struct GitHubConnector {
    client: GitHubClient,
    repositories: Vec<String>,
}

impl GitHubConnector {
    /// Build a connector with a `reqwest` transport from configuration
    ///
    /// Fails with a `Config` error when no token is available.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        let token = config.resolve_token()?;
        let transport =
            ReqwestTransport::new(&config.base_url, &token, config.request_timeout())?;

        Ok(Self::with_transport(Arc::new(transport), config.repositories.clone())
            .with_page_pause(config.page_pause()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, repositories: Vec<String>) -> Self {
        Self {
            client: GitHubClient::new(transport),
            repositories,
        }
    }

    pub fn with_page_pause(mut self, pause: Duration) -> Self {
        self.client = self.client.with_page_pause(pause);
        self
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// Fetch one task by `owner/repo/number`
    ///
    /// Malformed ids and missing issues both give `Ok(None)`; transport and
    /// server failures propagate.
    pub async fn get_task(&self, external_id: &str) -> Result<Option<StandardTask>> {
        let issue_ref = match IssueRef::parse(external_id) {
            Ok(issue_ref) => issue_ref,
            Err(e) => {
                warn!(error = %e, "Error parsing source ID for get_task");
                return Ok(None);
            }
        };

        match self.client.fetch_one(&issue_ref).await {
            Ok(Some(issue)) => to_standard_task(&issue, &issue_ref.repo_ref()).map(Some),
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(id = %external_id, error = %e, "Error fetching task");
                Err(e)
            }
        }
    }

    /// Apply `changes` to the issue named by `external_id`
    ///
    /// When nothing in `changes` maps to an issue field, no PATCH is sent and
    /// the current task is returned instead; a missing issue is then
    /// `NotFound`. This also happens for change sets that only touch fields
    /// GitHub has no place for, such as `due_date`.
    pub async fn update_task(&self, external_id: &str, changes: &ChangeSet) -> Result<StandardTask> {
        let issue_ref = IssueRef::parse(external_id)?;
        let payload = to_remote_payload(changes);

        if payload.is_empty() {
            debug!(
                id = %external_id,
                changes_empty = changes.is_empty(),
                "No writable changes, reading current task instead"
            );
            return self
                .get_task(external_id)
                .await?
                .ok_or_else(|| SyncError::NotFound(external_id.to_string()));
        }

        let updated = self
            .client
            .patch_one(&issue_ref, &payload)
            .await
            .inspect_err(|e| warn!(id = %external_id, error = %e, "Error updating task"))?;
        to_standard_task(&updated, &issue_ref.repo_ref())
    }

    fn classify(issue: &RemoteIssue, repo: &RepoRef) -> PollOutcome {
        match to_standard_task(issue, repo) {
            Ok(task) => PollOutcome::task(task),
            Err(e) => {
                let record = match issue.number() {
                    Some(number) => format!("{}#{}", repo, number),
                    None => format!("{}#N/A", repo),
                };
                warn!(record = %record, error = %e, "Error mapping GitHub issue");
                PollOutcome::Skipped(SkipReason::Record {
                    repo: repo.clone(),
                    error: SyncError::MappingFailed {
                        record,
                        source: Box::new(e),
                    },
                })
            }
        }
    }

    /// Poll every configured repository, yielding a tagged outcome per step
    ///
    /// Repositories are walked in configuration order and issues in
    /// ascending update order. Nothing here ends the stream early: bad
    /// repository names, failed pages and unmappable records each become a
    /// [`PollOutcome::Skipped`] and polling moves on.
    pub fn poll_outcomes<'a>(
        &'a self,
        cursor: Option<&'a SyncCursor>,
    ) -> impl Stream<Item = PollOutcome> + Send + 'a {
        let since = cursor.map(SyncCursor::as_str);

        stream! {
            for full_name in &self.repositories {
                let Some(repo) = RepoRef::parse(full_name) else {
                    warn!(repository = %full_name, "Invalid repository name format in config");
                    yield PollOutcome::Skipped(SkipReason::InvalidRepository(full_name.clone()));
                    continue;
                };

                info!(repo = %repo, since = since.unwrap_or("beginning"), "Checking repository");

                let issues = self.client.list_updated_since(&repo, since, POLL_STATE);
                pin_mut!(issues);
                while let Some(item) = issues.next().await {
                    match item {
                        Ok(issue) => yield Self::classify(&issue, &repo),
                        Err(e) => {
                            warn!(repo = %repo, error = %e, "Error polling GitHub repository");
                            yield PollOutcome::Skipped(SkipReason::Repository {
                                repo: repo.clone(),
                                error: e,
                            });
                        }
                    }
                }
            }

            info!(repositories = self.repositories.len(), "Finished polling repositories");
        }
    }

    /// Poll every configured repository for tasks updated since `cursor`
    ///
    /// `None` performs a full initial sync. The stream never fails; skipped
    /// records are logged. Record the time the poll started as the next
    /// cursor once the stream is drained.
    pub fn poll_changes<'a>(
        &'a self,
        cursor: Option<&'a SyncCursor>,
    ) -> impl Stream<Item = StandardTask> + Send + 'a {
        self.poll_outcomes(cursor)
            .filter_map(|outcome| future::ready(outcome.into_task()))
    }

    /// Release the transport
    pub async fn close(self) {
        self.client.close().await;
    }
}
