//! Integration test for the `collect` command.
//!
//! Runs the whole command against a wiremock server standing in for the GitHub API,
//! pointed to through a configuration file.

use gh_issue_stats_lib::Host;
use serde_json::json;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        Cursor::new(&mut self.output_buf)
    }

    fn error(&mut self) -> impl std::io::Write {
        Cursor::new(&mut self.error_buf)
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

fn write_config(dir: &Path, server: &MockServer) -> PathBuf {
    let config_path = dir.join("issue-stats.toml");
    fs::write(
        &config_path,
        format!(
            r#"
api_url = "{}"
web_url = "https://github.example"
min_request_interval = "1ms"
max_rate_limit_wait = "1m"
"#,
            server.uri()
        ),
    )
    .expect("Failed to write test config");
    config_path
}

async fn mount_github(server: &MockServer, total_count: u64) {
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": {
                "core": { "limit": 5000, "remaining": 5000, "reset": 1_715_959_800 },
                "search": { "limit": 30, "remaining": 30, "reset": 1_715_956_260 }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": total_count,
            "incomplete_results": false,
            "items": []
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unsupported_period_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    mount_github(&mock_server, 3).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server);

    let mut host = TestHost::new();
    let result = gh_issue_stats_lib::run(
        &mut host,
        [
            "gh-issue-stats",
            "collect",
            "-c",
            config_path.to_str().expect("valid path"),
            "-s",
            "atom/atom",
            "-p",
            "1s",
            "--github-token",
            "test-token",
        ],
    )
    .await;

    assert!(result.is_err(), "an unsupported granularity must be rejected");
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("unsupported granularity 's'"), "stderr: {}", host.error_str());
    assert!(mock_server.received_requests().await.expect("recording enabled").is_empty());
}

#[tokio::test]
async fn test_collect_writes_json_report() {
    let mock_server = MockServer::start().await;
    mount_github(&mock_server, 3).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server);
    let json_path = temp_dir.path().join("report.json");

    let mut host = TestHost::new();
    let result = gh_issue_stats_lib::run(
        &mut host,
        [
            "gh-issue-stats",
            "collect",
            "-c",
            config_path.to_str().expect("valid path"),
            "-s",
            "atom/atom",
            "-l",
            "bug",
            "-p",
            "1d",
            "-n",
            "2",
            "--now",
            "2024-05-17T14:30:00Z",
            "--github-token",
            "test-token",
            "--json",
            json_path.to_str().expect("valid path"),
        ],
    )
    .await;

    assert!(result.is_ok(), "collect command failed: {result:?}");
    assert!(host.output_str().is_empty(), "console output is only shown when no report file is written");

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).expect("read JSON")).expect("valid JSON");
    assert_eq!(parsed["period"], "1d");
    assert_eq!(parsed["scopes"], json!(["atom/atom"]));
    assert_eq!(parsed["labels"], json!(["bug"]));

    let intervals = parsed["intervals"].as_array().expect("intervals array");
    assert_eq!(intervals.len(), 2);
    assert_eq!(intervals[0]["name"], "Today");
    assert_eq!(intervals[0]["start"], "2024-05-17T00:00:00Z");
    assert_eq!(intervals[1]["end"], "2024-05-17T00:00:00Z");

    let cell = &intervals[1]["cells"][0];
    assert_eq!(cell["end_total"], 3);
    assert_eq!(cell["beginning_total"], 3);
    assert!(cell["urls"].get("open").is_none(), "only the newest interval queries the open total");

    // one token check plus (2 * 2 + 1) searches
    let requests = mock_server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_collect_on_period_boundary_names_completed_periods() {
    let mock_server = MockServer::start().await;
    mount_github(&mock_server, 3).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server);
    let json_path = temp_dir.path().join("report.json");

    let mut host = TestHost::new();
    let result = gh_issue_stats_lib::run(
        &mut host,
        [
            "gh-issue-stats",
            "collect",
            "-c",
            config_path.to_str().expect("valid path"),
            "-s",
            "atom/atom",
            "-p",
            "1d",
            "-n",
            "2",
            "--now",
            "2024-05-17T00:00:00Z",
            "--github-token",
            "test-token",
            "--json",
            json_path.to_str().expect("valid path"),
        ],
    )
    .await;

    assert!(result.is_ok(), "collect command failed: {result:?}");

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).expect("read JSON")).expect("valid JSON");
    let intervals = parsed["intervals"].as_array().expect("intervals array");
    assert_eq!(intervals[0]["name"], "Yesterday");
    assert_eq!(intervals[0]["start"], "2024-05-16T00:00:00Z");
    assert_eq!(intervals[1]["name"], "2 days ago");
}

#[tokio::test]
async fn test_collect_prints_console_table() {
    let mock_server = MockServer::start().await;
    mount_github(&mock_server, 4).await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "repo:atom/atom is:issue is:open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 12 })))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server);

    let mut host = TestHost::new();
    let result = gh_issue_stats_lib::run(
        &mut host,
        [
            "gh-issue-stats",
            "collect",
            "-c",
            config_path.to_str().expect("valid path"),
            "-s",
            "atom/atom",
            "-l",
            "issues",
            "-p",
            "1d",
            "-n",
            "1",
            "--now",
            "2024-05-17T14:30:00Z",
            "--github-token",
            "test-token",
            "--color",
            "never",
        ],
    )
    .await;

    assert!(result.is_ok(), "collect command failed: {result:?}");

    let output = host.output_str();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "atom/atom");
    assert!(lines[2].starts_with("period"));
    assert!(lines[4].starts_with("Today (2024-05-17)"), "output:\n{output}");
    assert!(lines[4].ends_with("12 (+4, -4)"), "output:\n{output}");
}

#[tokio::test]
async fn test_collect_rejects_bad_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), &mock_server);

    let mut host = TestHost::new();
    let result = gh_issue_stats_lib::run(
        &mut host,
        [
            "gh-issue-stats",
            "collect",
            "-c",
            config_path.to_str().expect("valid path"),
            "-s",
            "atom",
            "--github-token",
            "abcdefghijklmnop",
        ],
    )
    .await;

    assert!(result.is_err());
    assert!(host.error_str().contains("token abcdef... is not valid"), "stderr: {}", host.error_str());

    let requests = mock_server.received_requests().await.expect("recording enabled");
    assert!(requests.iter().all(|request| request.url.path() == "/rate_limit"));
}
