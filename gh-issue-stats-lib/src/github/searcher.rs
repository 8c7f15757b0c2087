use super::client::{ApiResult, Client, RateLimitInfo, RateLimitResponse, SearchResponse};
use super::query::{browse_url, rate_limit_url, search_api_url, search_query};
use super::throttler::Throttler;
use crate::Result;
use crate::series::{IssueSearch, LabelFilter, QuerySpec, Scope, SearchOutcome};
use chrono::Utc;
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, bail};
use std::sync::Arc;
use url::Url;

const LOG_TARGET: &str = "    github";

/// Consecutive rate-limited responses tolerated for a single search before giving up.
const MAX_RATE_LIMIT_RETRIES: u32 = 5;

/// Knobs for [`GitHubSearch`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub api_url: Url,
    pub web_url: Url,
    pub max_concurrent_requests: usize,

    /// Minimum spacing between two requests.
    pub min_request_interval: Duration,

    /// Longest time to wait for a rate limit to reset before failing.
    pub max_rate_limit_wait: Duration,
}

/// [`IssueSearch`] backed by the GitHub search API.
#[derive(Debug)]
pub struct GitHubSearch {
    client: Client,
    token: Option<String>,
    web_url: Url,
    throttler: Arc<Throttler>,
    max_rate_limit_wait: Duration,
}

impl GitHubSearch {
    pub fn new(token: Option<&str>, settings: &SearchSettings) -> Result<Self> {
        Ok(Self {
            client: Client::new(token, settings.api_url.clone())?,
            token: token.map(ToString::to_string),
            web_url: settings.web_url.clone(),
            throttler: Throttler::new(settings.max_concurrent_requests, settings.min_request_interval),
            max_rate_limit_wait: settings.max_rate_limit_wait,
        })
    }

    /// Check that the configured token is accepted, and log the remaining quotas.
    ///
    /// Does nothing when no token is configured.
    pub async fn verify_token(&self) -> Result<()> {
        let Some(token) = &self.token else {
            log::debug!(target: LOG_TARGET, "No GitHub token configured, using unauthenticated rate limits");
            return Ok(());
        };

        let url = rate_limit_url(self.client.api_base())?;
        let _permit = self.throttler.acquire().await;

        match self.client.api_call(&url).await {
            ApiResult::Success(resp, _) => {
                let limits: RateLimitResponse = resp.json().await.into_app_err("parsing the GitHub rate limit response")?;
                let core = &limits.resources.core;
                let search = &limits.resources.search;

                log::debug!(
                    target: LOG_TARGET,
                    "Core API quota: {}/{} remaining, resets at {}",
                    core.remaining,
                    core.limit,
                    core.reset.format("%T")
                );
                log::debug!(
                    target: LOG_TARGET,
                    "Search API quota: {}/{} remaining, resets at {}",
                    search.remaining,
                    search.limit,
                    search.reset.format("%T")
                );

                Ok(())
            }
            ApiResult::Unauthorized => bail!("token {}... is not valid", token_prefix(token)),
            ApiResult::RateLimited(info) => {
                log::debug!(target: LOG_TARGET, "Rate limited while verifying the token, resets at {}", info.reset_at);
                Ok(())
            }
            ApiResult::Failed(e) => Err(e.enrich_with(|| "verifying the GitHub token".to_string())),
        }
    }

    /// Pause all requests until `info` resets.
    ///
    /// Fails when the reset is further away than the configured maximum wait.
    fn wait_for_reset(&self, info: RateLimitInfo) -> Result<()> {
        let wait = (info.reset_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);

        if wait > self.max_rate_limit_wait {
            bail!(
                "GitHub rate limit resets at {}, which is more than the maximum wait of {}s away",
                info.reset_at.format("%T"),
                self.max_rate_limit_wait.as_secs()
            );
        }

        self.pause(wait);
        Ok(())
    }

    fn pause(&self, wait: Duration) {
        // the reset time may already have passed by our clock
        let wait = wait.max(Duration::from_secs(1));

        if self.throttler.pause_for(wait) {
            log::warn!(target: LOG_TARGET, "Hit GitHub rate limit, waiting {}s", wait.as_secs());
        }
    }
}

impl IssueSearch for GitHubSearch {
    async fn search(&self, scope: &Scope, label: &LabelFilter, spec: &QuerySpec) -> Result<SearchOutcome> {
        let query = search_query(scope, label, spec);
        let api_url = search_api_url(self.client.api_base(), &query)?;
        let url = browse_url(&self.web_url, &query)?;

        let mut rate_limited = 0;
        loop {
            let permit = self.throttler.acquire().await;
            log::trace!(target: LOG_TARGET, "Searching '{query}'");
            let result = self.client.api_call(&api_url).await;
            drop(permit);

            match result {
                ApiResult::Success(resp, rate_limit) => {
                    let body: SearchResponse = resp
                        .json()
                        .await
                        .into_app_err_with(|| format!("parsing the search response for '{query}'"))?;

                    // the quota is used up, hold back further requests until it resets
                    if let Some(info) = rate_limit
                        && info.remaining == 0
                    {
                        let wait = (info.reset_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                        self.pause(wait.min(self.max_rate_limit_wait));
                    }

                    log::debug!(target: LOG_TARGET, "'{query}' matched {} item(s)", body.total_count);

                    return Ok(SearchOutcome {
                        total_count: body.total_count,
                        url,
                        incomplete: body.incomplete_results,
                    });
                }

                ApiResult::RateLimited(info) => {
                    rate_limited += 1;
                    if rate_limited > MAX_RATE_LIMIT_RETRIES {
                        bail!("still rate limited after {MAX_RATE_LIMIT_RETRIES} waits while searching '{query}'");
                    }

                    log::debug!(
                        target: LOG_TARGET,
                        "Rate limited searching '{query}': {} remaining, resets at {}",
                        info.remaining,
                        info.reset_at.format("%T")
                    );
                    self.wait_for_reset(info)?;
                }

                ApiResult::Unauthorized => match &self.token {
                    Some(token) => bail!("token {}... is not valid", token_prefix(token)),
                    None => bail!("GitHub requires authentication for this search, set GITHUB_TOKEN or pass --github-token"),
                },

                ApiResult::Failed(e) => return Err(e.enrich_with(|| format!("searching GitHub for '{query}'"))),
            }
        }
    }
}

/// First characters of a token, enough to identify it without disclosing it.
fn token_prefix(token: &str) -> &str {
    token
        .char_indices()
        .nth(6)
        .and_then(|(end, _)| token.get(..end))
        .unwrap_or(token)
}
