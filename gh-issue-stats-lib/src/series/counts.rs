use super::SearchOutcome;
use core::fmt::{Display, Formatter};
use url::Url;

/// The three counts that make up a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountKind {
    End,
    New,
    Closed,
}

impl Display for CountKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::End => write!(f, "open"),
            Self::New => write!(f, "new"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// A data-quality problem that does not stop the series from being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataWarning {
    /// The search for this count reported incomplete results.
    IncompleteResults(CountKind),
}

impl Display for DataWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IncompleteResults(kind) => write!(f, "incomplete search results for the {kind} count"),
        }
    }
}

/// Where the end-of-interval total comes from.
#[derive(Debug, Clone)]
pub enum EndTotal {
    /// Queried live; only happens for the newest interval.
    Queried(SearchOutcome),

    /// The beginning total of the next newer interval.
    CarriedOver(i64),
}

/// Counts for one (scope, label) pair inside one interval.
///
/// `beginning_total` always equals `end_total + closed_total - new_total`. End and beginning totals
/// are signed because inconsistent search results can push the reconstruction below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLabelCounts {
    end_total: i64,
    new_total: u64,
    closed_total: u64,
    beginning_total: i64,
    end_total_url: Option<Url>,
    new_total_url: Url,
    closed_total_url: Url,
    warnings: Vec<DataWarning>,
}

impl ScopeLabelCounts {
    /// Combine the three counts of a cell and derive its beginning total.
    #[must_use]
    pub fn from_totals(end: EndTotal, new: SearchOutcome, closed: SearchOutcome) -> Self {
        let mut warnings = Vec::new();

        let (end_total, end_total_url) = match end {
            EndTotal::Queried(outcome) => {
                if outcome.incomplete {
                    warnings.push(DataWarning::IncompleteResults(CountKind::End));
                }
                (saturating_signed(outcome.total_count), Some(outcome.url))
            }
            EndTotal::CarriedOver(total) => (total, None),
        };

        if new.incomplete {
            warnings.push(DataWarning::IncompleteResults(CountKind::New));
        }

        if closed.incomplete {
            warnings.push(DataWarning::IncompleteResults(CountKind::Closed));
        }

        let beginning_total = end_total
            .saturating_add(saturating_signed(closed.total_count))
            .saturating_sub(saturating_signed(new.total_count));

        Self {
            end_total,
            new_total: new.total_count,
            closed_total: closed.total_count,
            beginning_total,
            end_total_url,
            new_total_url: new.url,
            closed_total_url: closed.url,
            warnings,
        }
    }

    /// Number of open items at the end of the interval.
    #[must_use]
    pub const fn end_total(&self) -> i64 {
        self.end_total
    }

    /// Number of items created during the interval.
    #[must_use]
    pub const fn new_total(&self) -> u64 {
        self.new_total
    }

    /// Number of items closed during the interval.
    #[must_use]
    pub const fn closed_total(&self) -> u64 {
        self.closed_total
    }

    /// Number of open items at the beginning of the interval.
    #[must_use]
    pub const fn beginning_total(&self) -> i64 {
        self.beginning_total
    }

    #[must_use]
    pub const fn end_total_url(&self) -> Option<&Url> {
        self.end_total_url.as_ref()
    }

    #[must_use]
    pub const fn new_total_url(&self) -> &Url {
        &self.new_total_url
    }

    #[must_use]
    pub const fn closed_total_url(&self) -> &Url {
        &self.closed_total_url
    }

    #[must_use]
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn has_incomplete_results(&self) -> bool {
        self.warnings.iter().any(|w| matches!(w, DataWarning::IncompleteResults(_)))
    }

    /// Whether both open totals are non-negative, as they must be when the search results agree.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.end_total >= 0 && self.beginning_total >= 0
    }
}

fn saturating_signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
