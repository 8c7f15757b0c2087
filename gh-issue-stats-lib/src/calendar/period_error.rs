use core::fmt::{Display, Formatter};

/// Reasons a period specification such as `2w` can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// The specification was empty.
    Empty,

    /// The unit is not one of `h`, `d`, `w`, `m`, `y`.
    UnsupportedGranularity(String),

    /// The multiplier is missing, zero, or too large.
    InvalidMultiplier(String),
}

impl Display for PeriodError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty period specification"),
            Self::UnsupportedGranularity(unit) => {
                write!(f, "unsupported granularity '{unit}', expected one of h, d, w, m, y")
            }
            Self::InvalidMultiplier(spec) => {
                write!(f, "invalid multiplier in period '{spec}', expected a positive integer such as '2w'")
            }
        }
    }
}

impl core::error::Error for PeriodError {}
