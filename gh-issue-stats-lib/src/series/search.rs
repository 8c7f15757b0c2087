use super::{LabelFilter, QuerySpec, Scope};
use crate::Result;
use url::Url;

/// The answer to one search: how many items matched, and where a person can browse them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub total_count: u64,

    /// Web page listing the matching items, for manual verification.
    pub url: Url,

    /// The search backend gave up before examining every candidate, so `total_count` may be low.
    pub incomplete: bool,
}

/// The one capability the series builder needs from its environment.
///
/// Implementations own authentication, throttling, and retries. An error returned from
/// [`IssueSearch::search`] aborts the whole series.
pub trait IssueSearch: Send + Sync {
    fn search(&self, scope: &Scope, label: &LabelFilter, spec: &QuerySpec) -> impl Future<Output = Result<SearchOutcome>> + Send;
}
