//! Period arithmetic over a fixed UTC calendar
//!
//! Two pure operations drive the interval chain:
//!
//! - [`start_of_current_period`] truncates a timestamp down to the start of the
//!   hour, day, ISO week (Monday), month, or year that contains it.
//! - [`step_back`] moves a period boundary back by a number of periods while
//!   keeping its time of day, clamping the day of month where the target month
//!   is shorter.
//!
//! The first interval of a series is anchored with [`start_of_current_period`];
//! every older interval is derived from it with [`step_back`], so all boundaries
//! after the first one line up on period starts.

mod boundaries;
mod granularity;
mod period_error;
mod period_spec;

pub use boundaries::{start_of_current_period, step_back};
pub use granularity::Granularity;
pub use period_error::PeriodError;
pub use period_spec::PeriodSpec;
