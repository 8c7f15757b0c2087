//! Integration test against the live GitHub search API.
//!
//! Gated behind the `network_tests` feature:
//! ```sh
//! cargo test --features network_tests -p gh-issue-stats-lib --test github_network_integration
//! ```
//!
//! Set `GITHUB_TOKEN` to avoid the low unauthenticated search quota.

#![cfg(feature = "network_tests")]

use core::time::Duration;
use gh_issue_stats_lib::github::{GitHubSearch, SearchSettings};
use gh_issue_stats_lib::series::{LabelFilter, Progress, Scope, SeriesRequest, build_series};
use url::Url;

struct NoOpProgress;

impl Progress for NoOpProgress {
    fn set_phase(&self, _phase: &str) {}
    fn set_determinate(&self, _callback: Box<dyn Fn() -> (u64, u64, String) + Send + Sync + 'static>) {}
    fn set_indeterminate(&self, _callback: Box<dyn Fn() -> String + Send + Sync + 'static>) {}
    fn done(&self) {}
}

#[tokio::test]
async fn test_live_series_for_public_repository() {
    let token = std::env::var("GITHUB_TOKEN").ok();
    let settings = SearchSettings {
        api_url: Url::parse("https://api.github.com").unwrap(),
        web_url: Url::parse("https://github.com").unwrap(),
        max_concurrent_requests: 2,
        min_request_interval: Duration::from_secs(1),
        max_rate_limit_wait: Duration::from_secs(120),
    };

    let search = GitHubSearch::new(token.as_deref(), &settings).expect("client");
    search.verify_token().await.expect("token accepted");

    let request = SeriesRequest {
        reference_now: chrono::Utc::now(),
        period: "1m".parse().unwrap(),
        interval_count: 2,
        scopes: vec![Scope::parse("rust-lang/rust").unwrap()],
        labels: vec![LabelFilter::Issues],
    };

    let series = build_series(&request, &search, &NoOpProgress).await.expect("series");
    assert_eq!(series.len(), 2);

    let newest = series.slices()[0].get(&request.scopes[0], &request.labels[0]).expect("cell");
    assert!(newest.end_total() > 0, "rust-lang/rust always has open issues");
    assert!(newest.end_total_url().is_some());
}
