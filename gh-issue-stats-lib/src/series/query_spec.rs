use super::TimeWindow;
use core::fmt::{Display, Formatter};

/// Issue or pull request state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    Open,
    Closed,
}

impl Display for ItemState {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// The filters of one search, beyond scope and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct QuerySpec {
    pub state: Option<ItemState>,
    pub created_between: Option<TimeWindow>,
    pub closed_between: Option<TimeWindow>,
}

impl QuerySpec {
    /// Items open right now.
    #[must_use]
    pub const fn open_now() -> Self {
        Self {
            state: Some(ItemState::Open),
            created_between: None,
            closed_between: None,
        }
    }

    /// Items created inside `window`, whatever their current state.
    #[must_use]
    pub const fn created_in(window: TimeWindow) -> Self {
        Self {
            state: None,
            created_between: Some(window),
            closed_between: None,
        }
    }

    /// Closed items whose close date falls inside `window`.
    #[must_use]
    pub const fn closed_in(window: TimeWindow) -> Self {
        Self {
            state: Some(ItemState::Closed),
            created_between: None,
            closed_between: Some(window),
        }
    }
}
