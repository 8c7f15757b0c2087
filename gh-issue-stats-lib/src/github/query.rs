//! Search query strings and the URLs built around them.

use crate::Result;
use crate::series::{LabelFilter, QuerySpec, Scope, TimeWindow};
use chrono::{SecondsFormat, TimeDelta};
use ohno::app_err;
use url::Url;

/// Build the search-syntax query string for one count.
///
/// Terms are emitted in a fixed order: scope, item kind or label, state, then the created and
/// closed ranges.
#[must_use]
pub fn search_query(scope: &Scope, label: &LabelFilter, spec: &QuerySpec) -> String {
    let mut terms = Vec::with_capacity(5);

    terms.push(match scope {
        Scope::Owner(owner) => format!("user:{owner}"),
        Scope::Repository { owner, repo } => format!("repo:{owner}/{repo}"),
    });

    terms.push(match label {
        LabelFilter::Issues => "is:issue".to_string(),
        LabelFilter::PullRequests => "is:pr".to_string(),
        LabelFilter::Label(name) if name.chars().any(char::is_whitespace) => format!("label:\"{name}\""),
        LabelFilter::Label(name) => format!("label:{name}"),
    });

    if let Some(state) = spec.state {
        terms.push(format!("is:{state}"));
    }

    if let Some(window) = &spec.created_between {
        terms.push(format!("created:{}", date_range(window)));
    }

    if let Some(window) = &spec.closed_between {
        terms.push(format!("closed:{}", date_range(window)));
    }

    terms.join(" ")
}

/// Inclusive `first..last` range covering the half-open `window`.
///
/// Search ranges include both ends, so the range stops at the last whole second before the
/// window's end. Adjacent windows then never match the same item.
fn date_range(window: &TimeWindow) -> String {
    let last = window.end() - TimeDelta::nanoseconds(1);
    format!(
        "{}..{}",
        window.start().to_rfc3339_opts(SecondsFormat::Secs, true),
        last.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Web page listing the items matched by `query`.
pub fn browse_url(web_base: &Url, query: &str) -> Result<Url> {
    let mut url = with_path(web_base, &["issues"])?;
    let _ = url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

/// API endpoint answering `query` with a single result item, since only the total is needed.
pub fn search_api_url(api_base: &Url, query: &str) -> Result<Url> {
    let mut url = with_path(api_base, &["search", "issues"])?;
    let _ = url.query_pairs_mut().append_pair("q", query).append_pair("per_page", "1");
    Ok(url)
}

pub fn rate_limit_url(api_base: &Url) -> Result<Url> {
    with_path(api_base, &["rate_limit"])
}

fn with_path(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);

    let _ = url
        .path_segments_mut()
        .map_err(|()| app_err!("'{base}' cannot be used as a base URL"))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
