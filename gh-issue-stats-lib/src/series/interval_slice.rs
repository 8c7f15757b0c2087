use super::{LabelFilter, Scope, ScopeLabelCounts, TimeWindow};
use std::collections::HashMap;

/// Composite key of a cell inside an interval.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub scope: Scope,
    pub label: LabelFilter,
}

impl CellKey {
    #[must_use]
    pub const fn new(scope: Scope, label: LabelFilter) -> Self {
        Self { scope, label }
    }
}

/// One point of the series: a time window and the counts of every (scope, label) cell in it.
#[derive(Debug, Clone)]
pub struct IntervalSlice {
    window: TimeWindow,
    cells: HashMap<CellKey, ScopeLabelCounts>,
}

impl IntervalSlice {
    #[must_use]
    pub fn new(window: TimeWindow, cells: impl IntoIterator<Item = (CellKey, ScopeLabelCounts)>) -> Self {
        Self {
            window,
            cells: cells.into_iter().collect(),
        }
    }

    #[must_use]
    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    #[must_use]
    pub fn get(&self, scope: &Scope, label: &LabelFilter) -> Option<&ScopeLabelCounts> {
        // HashMap lookups need an owned key of the same type
        self.cells.get(&CellKey::new(scope.clone(), label.clone()))
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &ScopeLabelCounts)> {
        self.cells.iter()
    }
}
