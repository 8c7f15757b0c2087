//! Interval accounting: reconstructing past issue counts from present totals
//!
//! The search API can only answer "how many items match right now". This module turns
//! those answers into a backward-looking time series using the accounting identity
//!
//! ```text
//! beginning_total = end_total + closed_total - new_total
//! ```
//!
//! # Implementation Model
//!
//! [`build_series`] walks backward from a reference instant through the requested number of
//! intervals. The newest interval is anchored at the start of the current period (see
//! [`crate::calendar`]); every older interval ends where the newer one began.
//!
//! For each (scope, label) cell the builder issues:
//! - one "open right now" query, but only for the newest interval,
//! - one "created inside the window" query,
//! - one "closed inside the window" query.
//!
//! Older intervals reuse the beginning total of the newer interval as their end total, so
//! a series of N intervals costs `(2N + 1)` queries per cell instead of `3N`.
//!
//! Searches go through the [`IssueSearch`] trait so the algorithm is independent of
//! HTTP, authentication, and rate limiting. Any search failure aborts the whole series;
//! an "incomplete results" flag is kept as a [`DataWarning`] on the affected cell.

mod builder;
mod counts;
mod interval_slice;
mod label_filter;
mod progress;
mod query_spec;
mod scope;
mod search;
mod statistics_series;
mod time_window;

pub use builder::{SeriesRequest, build_series};
pub use counts::{CountKind, DataWarning, EndTotal, ScopeLabelCounts};
pub use interval_slice::{CellKey, IntervalSlice};
pub use label_filter::LabelFilter;
pub use progress::Progress;
pub use query_spec::{ItemState, QuerySpec};
pub use scope::Scope;
pub use search::{IssueSearch, SearchOutcome};
pub use statistics_series::StatisticsSeries;
pub use time_window::TimeWindow;
