//! GitHub API client
//!
//! Minimal client for the search and rate-limit endpoints.

use super::resilient_http::resilient_get;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use url::Url;

/// The fields of a search response we need; the items themselves are ignored.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
}

/// Response of the `/rate_limit` endpoint.
#[derive(Debug, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitQuota,
    pub search: RateLimitQuota,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitQuota {
    pub limit: u64,
    pub remaining: u64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub reset: DateTime<Utc>,
}

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: u64,
    pub reset_at: DateTime<Utc>,
}

/// Result of an API call
#[derive(Debug)]
pub enum ApiResult {
    /// Request succeeded, with the rate limit info of the response if any
    Success(reqwest::Response, Option<RateLimitInfo>),

    /// Rate limited, should retry after the reset time
    RateLimited(RateLimitInfo),

    /// The credentials were rejected (401)
    Unauthorized,

    /// Request failed permanently, should NOT retry
    Failed(ohno::AppError),
}

/// How long to wait when a rate-limited response carries no reset time.
const DEFAULT_RATE_LIMIT_WAIT: TimeDelta = TimeDelta::minutes(1);

/// GitHub API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    api_base: Url,
}

impl Client {
    /// Create a new client with an optional authentication token.
    pub fn new(token: Option<&str>, api_base: Url) -> crate::Result<Self> {
        use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};

        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);
            let _ = headers.insert(AUTHORIZATION, auth_val);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("gh-issue-stats/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, api_base })
    }

    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Make an API call and classify the result
    pub async fn api_call(&self, url: &Url) -> ApiResult {
        let resp = match resilient_get(&self.client, url).await {
            Ok(r) => r,
            Err(e) => return ApiResult::Failed(e),
        };

        // Extract rate limit info from response headers before checking status
        let rate_limit = extract_rate_limit_from_headers(resp.headers());

        let status = resp.status();
        if status.is_success() {
            return ApiResult::Success(resp, rate_limit);
        }

        if status == StatusCode::UNAUTHORIZED {
            return ApiResult::Unauthorized;
        }

        // A 403 is only a rate limit when the quota is exhausted; otherwise it is a permission problem
        let exhausted = rate_limit.is_none_or(|rl| rl.remaining == 0);
        if status == StatusCode::TOO_MANY_REQUESTS || (status == StatusCode::FORBIDDEN && exhausted) {
            let rate_limit = rate_limit.unwrap_or_else(|| RateLimitInfo {
                remaining: 0,
                reset_at: Utc::now() + DEFAULT_RATE_LIMIT_WAIT,
            });
            return ApiResult::RateLimited(rate_limit);
        }

        match resp.error_for_status() {
            Ok(resp) => ApiResult::Failed(ohno::app_err!("unexpected HTTP status {} from {}", resp.status(), url.path())),
            Err(e) => ApiResult::Failed(e.into()),
        }
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<u64>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}
