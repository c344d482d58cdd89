//! Integration tests for issuesync
//!
//! These tests run the connector end to end against a mock GitHub API:
//! config → reqwest transport → client → mapping → poll/get/update.

use futures::StreamExt;
use issuesync::config::ConnectorConfig;
use issuesync::sync::{GitHubConnector, PollOutcome, SkipReason, SyncCursor};
use issuesync::{ChangeSet, SyncError, TaskStatus};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;

const TOKEN: &str = "dummy_github_token_123";

fn issue(number: u64, state: &str) -> Value {
    json!({
        "number": number,
        "title": format!("Issue {}", number),
        "state": state,
        "body": "Client test body",
        "html_url": format!("https://github.com/octo/a/issues/{}", number),
        "created_at": "2024-02-01T10:00:00Z",
        "updated_at": "2024-02-02T11:00:00Z",
    })
}

fn connector(server: &ServerGuard, repos: &[&str]) -> GitHubConnector {
    let mut config = ConnectorConfig::new()
        .with_token(TOKEN)
        .with_base_url(server.url())
        .with_page_pause(Duration::ZERO);
    for repo in repos {
        config = config.with_repository(*repo);
    }
    GitHubConnector::from_config(&config).expect("connector")
}

fn first_page_query(since: Option<&str>) -> Matcher {
    let mut params = vec![
        Matcher::UrlEncoded("state".into(), "all".into()),
        Matcher::UrlEncoded("sort".into(), "updated".into()),
        Matcher::UrlEncoded("direction".into(), "asc".into()),
        Matcher::UrlEncoded("per_page".into(), "100".into()),
    ];
    if let Some(since) = since {
        params.push(Matcher::UrlEncoded("since".into(), since.into()));
    }
    Matcher::AllOf(params)
}

mod get_tests {
    use super::*;

    #[tokio::test]
    async fn get_task_sends_auth_headers_and_maps() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/a/issues/42")
            .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
            .match_header("accept", "application/vnd.github.v3+json")
            .match_header("x-github-api-version", "2022-11-28")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(issue(42, "closed").to_string())
            .expect(1)
            .create_async()
            .await;

        let connector = connector(&server, &[]);
        let task = connector
            .get_task("octo/a/42")
            .await
            .unwrap()
            .expect("task");

        mock.assert_async().await;
        assert_eq!(task.source_id, "octo/a/42");
        assert_eq!(task.source_name, "github");
        assert_eq!(task.name, "Issue 42");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.description.as_deref(), Some("Client test body"));
        connector.close().await;
    }

    #[tokio::test]
    async fn get_task_not_found_is_none() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/octo/a/issues/999")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .expect(1)
            .create_async()
            .await;

        let task = connector(&server, &[]).get_task("octo/a/999").await.unwrap();

        mock.assert_async().await;
        assert!(task.is_none());
    }

    #[tokio::test]
    async fn get_task_server_error_carries_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/octo/a/issues/1")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = connector(&server, &[]).get_task("octo/a/1").await.unwrap_err();
        match err {
            SyncError::RemoteRequestFailed { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.as_deref(), Some("Internal Server Error"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

mod update_tests {
    use super::*;

    #[tokio::test]
    async fn update_task_sends_mapped_payload() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/repos/octo/a/issues/7")
            .match_body(Matcher::Json(json!({"title": "Renamed", "state": "closed"})))
            .with_status(200)
            .with_body(issue(7, "closed").to_string())
            .expect(1)
            .create_async()
            .await;

        let changes = ChangeSet::new()
            .with_name("Renamed")
            .with_status(TaskStatus::Done);
        let task = connector(&server, &[])
            .update_task("octo/a/7", &changes)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn update_with_no_writable_changes_on_missing_issue_is_not_found() {
        let mut server = Server::new_async().await;
        let get = server
            .mock("GET", "/repos/octo/a/issues/404")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let patch = server
            .mock("PATCH", "/repos/octo/a/issues/404")
            .expect(0)
            .create_async()
            .await;

        let err = connector(&server, &[])
            .update_task("octo/a/404", &ChangeSet::new())
            .await
            .unwrap_err();

        get.assert_async().await;
        patch.assert_async().await;
        assert!(matches!(err, SyncError::NotFound(_)));
        assert!(err.to_string().contains("octo/a/404"));
    }

    #[tokio::test]
    async fn update_with_bad_id_fails_before_any_request() {
        let server = Server::new_async().await;
        let err = connector(&server, &[])
            .update_task("octo/a/not-a-number", &ChangeSet::new().with_name("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidId(_)));
    }
}

mod poll_tests {
    use super::*;

    #[tokio::test]
    async fn poll_follows_link_header_across_pages() {
        let mut server = Server::new_async().await;
        let since = "2024-01-01T00:00:00Z";
        let next = format!("<{}/repositories/1/issues?page=2>; rel=\"next\"", server.url());

        let page1 = server
            .mock("GET", "/repos/octo/a/issues")
            .match_query(first_page_query(Some(since)))
            .with_status(200)
            .with_header("link", &next)
            .with_body(json!([issue(1, "open"), issue(2, "open")]).to_string())
            .expect(1)
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/repositories/1/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(json!([issue(3, "closed")]).to_string())
            .expect(1)
            .create_async()
            .await;

        let connector = connector(&server, &["octo/a"]);
        let cursor = SyncCursor::from(since);
        let tasks: Vec<_> = connector.poll_changes(Some(&cursor)).collect().await;

        page1.assert_async().await;
        page2.assert_async().await;
        let ids: Vec<_> = tasks.iter().map(|t| t.source_id.as_str()).collect();
        assert_eq!(ids, vec!["octo/a/1", "octo/a/2", "octo/a/3"]);
        assert_eq!(tasks[2].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn poll_survives_page_failure_and_bad_records() {
        let mut server = Server::new_async().await;
        let next = format!("<{}/repositories/1/issues?page=2>; rel=\"next\"", server.url());

        server
            .mock("GET", "/repos/octo/a/issues")
            .match_query(first_page_query(None))
            .with_status(200)
            .with_header("link", &next)
            .with_body(json!([issue(1, "open")]).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/repositories/1/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/b/issues")
            .match_query(first_page_query(None))
            .with_status(200)
            .with_body(
                json!([
                    {"title": "missing number", "state": "open"},
                    issue(5, "open"),
                    {"number": 6, "pull_request": {"url": "x"}, "state": "open"}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let connector = connector(&server, &["octo/a", "broken", "octo/b"]);
        let outcomes: Vec<_> = connector.poll_outcomes(None).collect().await;

        let tasks: Vec<_> = outcomes
            .iter()
            .filter_map(|o| match o {
                PollOutcome::Task(task) => Some(task.source_id.clone()),
                PollOutcome::Skipped(_) => None,
            })
            .collect();
        assert_eq!(tasks, vec!["octo/a/1", "octo/b/5"]);

        let skips: Vec<_> = outcomes
            .iter()
            .filter_map(|o| match o {
                PollOutcome::Skipped(reason) => Some(reason),
                PollOutcome::Task(_) => None,
            })
            .collect();
        assert_eq!(skips.len(), 3);
        assert!(matches!(skips[0], SkipReason::Repository { error, .. } if error.status() == Some(502)));
        assert!(matches!(skips[1], SkipReason::InvalidRepository(name) if name == "broken"));
        assert!(matches!(skips[2], SkipReason::Record { .. }));
    }
}

mod config_tests {
    use super::*;

    #[tokio::test]
    async fn connector_from_saved_config() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/octo/a/issues")
            .match_query(first_page_query(None))
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        ConnectorConfig::new()
            .with_token(TOKEN)
            .with_base_url(server.url())
            .with_repository("octo/a")
            .save(&path)
            .unwrap();

        let config = ConnectorConfig::load(&path).unwrap();
        let connector = GitHubConnector::from_config(&config).unwrap();
        assert_eq!(connector.repositories(), ["octo/a".to_string()]);

        let tasks: Vec<_> = connector.poll_changes(None).collect().await;
        assert!(tasks.is_empty());
        connector.close().await;
    }

    #[test]
    fn connector_requires_token() {
        let config = ConnectorConfig::new().with_token("").with_repository("octo/a");
        // Only meaningful when the environment provides no fallback
        if std::env::var("GITHUB_TOKEN").is_err() {
            let err = GitHubConnector::from_config(&config).err().expect("missing token");
            assert!(matches!(err, SyncError::Config(_)));
        }
    }
}
