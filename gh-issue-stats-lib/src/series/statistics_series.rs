use super::{IntervalSlice, LabelFilter, Scope};
use crate::calendar::{PeriodSpec, start_of_current_period};

/// The full output of the builder, newest interval first.
///
/// Scopes and labels are kept in the order they were requested so reports can lay out their
/// columns and tables the way the user listed them.
#[derive(Debug, Clone)]
pub struct StatisticsSeries {
    period: PeriodSpec,
    scopes: Vec<Scope>,
    labels: Vec<LabelFilter>,
    slices: Vec<IntervalSlice>,
}

impl StatisticsSeries {
    #[must_use]
    pub const fn new(period: PeriodSpec, scopes: Vec<Scope>, labels: Vec<LabelFilter>, slices: Vec<IntervalSlice>) -> Self {
        Self {
            period,
            scopes,
            labels,
            slices,
        }
    }

    #[must_use]
    pub const fn period(&self) -> PeriodSpec {
        self.period
    }

    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    #[must_use]
    pub fn labels(&self) -> &[LabelFilter] {
        &self.labels
    }

    #[must_use]
    pub fn slices(&self) -> &[IntervalSlice] {
        &self.slices
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// How many periods before the current one the interval at `index` lies.
    ///
    /// The newest interval is normally the running period. A series built exactly on a period
    /// boundary starts with the previous, complete period instead, which shifts every interval by one.
    #[must_use]
    pub fn periods_ago(&self, index: usize) -> usize {
        let newest_is_current = self.slices.first().is_none_or(|newest| {
            let window = newest.window();
            start_of_current_period(window.end(), self.period.granularity()) == window.start()
        });

        if newest_is_current { index } else { index + 1 }
    }

    /// Number of cells, across all intervals, that carry at least one data-quality warning.
    #[must_use]
    pub fn cells_with_warnings(&self) -> usize {
        self.slices
            .iter()
            .flat_map(IntervalSlice::cells)
            .filter(|(_, counts)| !counts.warnings().is_empty())
            .count()
    }

    /// Number of cells whose reconstructed totals went negative.
    #[must_use]
    pub fn inconsistent_cells(&self) -> usize {
        self.slices
            .iter()
            .flat_map(IntervalSlice::cells)
            .filter(|(_, counts)| !counts.is_consistent())
            .count()
    }
}
