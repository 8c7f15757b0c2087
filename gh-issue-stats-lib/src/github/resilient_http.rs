//! Resilient HTTP GET with retry and timeout.
//!
//! Transient failures (network errors, 5xx responses, and 429 responses) are retried with
//! exponential backoff so that callers only see errors that persisted.

use crate::Result;
use core::time::Duration;
use reqwest::StatusCode;
use url::Url;

const LOG_TARGET: &str = "      http";

/// Timeout for a single request attempt.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum retry attempts (on top of the original request).
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between retries.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Delay used for 429 responses that carry no `Retry-After` header.
const DEFAULT_TOO_MANY_REQUESTS_DELAY: Duration = Duration::from_secs(5);

/// Parse the `Retry-After` header value as seconds.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let s = headers.get(reqwest::header::RETRY_AFTER).and_then(|h| h.to_str().ok())?;
    s.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Decide whether `result` should be retried, and after which delay.
///
/// `attempt` is the zero-based index of the attempt that produced `result`.
fn retry_delay(result: &Result<reqwest::Response>, attempt: u32) -> Option<Duration> {
    if attempt >= MAX_RETRY_ATTEMPTS {
        return None;
    }

    let backoff = RETRY_BASE_DELAY.saturating_mul(2_u32.saturating_pow(attempt));

    match result {
        // Network / connection errors are always transient.
        Err(_) => Some(backoff),

        // Server errors (5xx) are transient.
        Ok(resp) if resp.status().is_server_error() => Some(backoff),

        // Rate-limited (429), honor Retry-After if present.
        Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
            Some(parse_retry_after(resp.headers()).unwrap_or(DEFAULT_TOO_MANY_REQUESTS_DELAY))
        }

        // Secondary rate limit (403 with Retry-After).
        Ok(resp) if resp.status() == StatusCode::FORBIDDEN => parse_retry_after(resp.headers()),

        // Everything else (success, 4xx client errors) is not retried.
        Ok(_) => None,
    }
}

/// Send an HTTP GET request with automatic retry and timeout.
pub async fn resilient_get(client: &reqwest::Client, url: &Url) -> Result<reqwest::Response> {
    let mut attempt = 0;

    loop {
        let result = client
            .get(url.clone())
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(ohno::AppError::from);

        let Some(delay) = retry_delay(&result, attempt) else {
            return result;
        };

        attempt += 1;
        log::debug!(
            target: LOG_TARGET,
            "Retrying GET {} (attempt {attempt}, delay {}ms)",
            url.path(),
            delay.as_millis()
        );

        tokio::time::sleep(delay).await;
    }
}
