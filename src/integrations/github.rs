//! GitHub Issues REST client
//!
//! Single-issue reads and writes plus an incremental, paged listing that
//! follows `Link: rel="next"` headers.

use super::ids::{IssueRef, RepoRef};
use super::record::{RemoteIssue, UpdateIssueRequest};
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::{Result, SyncError};
use async_stream::stream;
use futures::Stream;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Issues requested per page (GitHub maximum)
pub const PAGE_SIZE: u32 = 100;

/// Default pause between page fetches
pub const DEFAULT_PAGE_PAUSE: Duration = Duration::from_millis(100);

/// GitHub Issues client over a [`Transport`]
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn Transport>,
    page_pause: Duration,
}

fn issue_path(issue: &IssueRef) -> String {
    format!("/repos/{}/{}/issues/{}", issue.owner, issue.repo, issue.number)
}

fn request_failed(response: ApiResponse) -> SyncError {
    SyncError::RemoteRequestFailed {
        status: response.status,
        body: response.body_text(),
    }
}

impl GitHubClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            page_pause: DEFAULT_PAGE_PAUSE,
        }
    }

    /// Pause inserted between page fetches; zero disables it
    pub fn with_page_pause(mut self, pause: Duration) -> Self {
        self.page_pause = pause;
        self
    }

    pub fn page_pause(&self) -> Duration {
        self.page_pause
    }

    /// Release the underlying transport
    pub async fn close(&self) {
        self.transport.close().await;
    }

    /// Fetch a single issue
    ///
    /// A 404 and a successful response with an empty body are both `Ok(None)`.
    pub async fn fetch_one(&self, issue: &IssueRef) -> Result<Option<RemoteIssue>> {
        debug!(issue = %issue, "Fetching GitHub issue");

        let response = self
            .transport
            .request(ApiRequest::get(issue_path(issue)))
            .await?;

        match response.status {
            404 => Ok(None),
            _ if response.is_success() => {
                let record = RemoteIssue::from(response.body);
                if record.is_empty() {
                    debug!(issue = %issue, "Empty GitHub issue payload");
                    return Ok(None);
                }
                Ok(Some(record))
            }
            status => {
                warn!(issue = %issue, status, "GitHub API error getting issue");
                Err(request_failed(response))
            }
        }
    }

    /// Apply a partial update and return the issue as GitHub now has it
    ///
    /// A 404 is `RemoteNotFound`; other failures carry their status.
    pub async fn patch_one(
        &self,
        issue: &IssueRef,
        payload: &UpdateIssueRequest,
    ) -> Result<RemoteIssue> {
        info!(issue = %issue, "Updating GitHub issue");

        let body = serde_json::to_value(payload)?;
        let response = self
            .transport
            .request(ApiRequest::patch(issue_path(issue), body))
            .await?;

        match response.status {
            _ if response.is_success() => Ok(RemoteIssue::from(response.body)),
            404 => {
                warn!(issue = %issue, "GitHub issue not found for update");
                Err(SyncError::RemoteNotFound(issue.to_string()))
            }
            status => {
                warn!(issue = %issue, status, "GitHub API error updating issue");
                Err(request_failed(response))
            }
        }
    }

    fn list_request(repo: &RepoRef, since: Option<&str>, state: &str) -> ApiRequest {
        let request = ApiRequest::get(format!("/repos/{}/{}/issues", repo.owner, repo.repo))
            .with_param("state", state)
            .with_param("sort", "updated")
            .with_param("direction", "asc")
            .with_param("per_page", PAGE_SIZE.to_string());
        match since {
            Some(since) => request.with_param("since", since),
            None => request,
        }
    }

    async fn fetch_page(&self, request: ApiRequest) -> Result<(Vec<RemoteIssue>, Option<String>)> {
        let response = self.transport.request(request).await?;
        if !response.is_success() {
            return Err(request_failed(response));
        }
        match response.body {
            Value::Array(items) => Ok((
                items.into_iter().map(RemoteIssue::from).collect(),
                response.next_link,
            )),
            other => Err(SyncError::InvalidRecord(format!(
                "expected a JSON array of issues, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Stream issues of `repo` updated since `since`, oldest update first
    ///
    /// Nothing is requested until the stream is polled, and dropping it stops
    /// further requests. Pull requests are filtered out. The first request
    /// carries the filters; later pages come from the `next` link as-is. A
    /// failed page is yielded once as an `Err` and ends the stream; records
    /// yielded before it stay valid.
    pub fn list_updated_since<'a>(
        &'a self,
        repo: &'a RepoRef,
        since: Option<&'a str>,
        state: &'a str,
    ) -> impl Stream<Item = Result<RemoteIssue>> + Send + 'a {
        stream! {
            let mut request = Some(Self::list_request(repo, since, state));
            let mut page = 0u32;

            while let Some(current) = request.take() {
                page += 1;
                let (issues, next_link) = match self.fetch_page(current).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(repo = %repo, page, error = %e, "GitHub API error listing issues");
                        yield Err(e);
                        break;
                    }
                };

                debug!(repo = %repo, page, count = issues.len(), "Fetched issue page");
                if issues.is_empty() {
                    break;
                }

                for issue in issues {
                    if issue.is_pull_request() {
                        continue;
                    }
                    yield Ok(issue);
                }

                if let Some(link) = next_link {
                    if !self.page_pause.is_zero() {
                        tokio::time::sleep(self.page_pause).await;
                    }
                    request = Some(ApiRequest::get(link));
                }
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
