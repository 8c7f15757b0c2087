use super::PeriodError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The calendar unit of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    /// Map a unit letter (`h`, `d`, `w`, `m`, `y`) to a granularity.
    pub fn from_code(code: &str) -> Result<Self, PeriodError> {
        match code {
            "h" => Ok(Self::Hour),
            "d" => Ok(Self::Day),
            "w" => Ok(Self::Week),
            "m" => Ok(Self::Month),
            "y" => Ok(Self::Year),
            other => Err(PeriodError::UnsupportedGranularity(other.to_string())),
        }
    }

    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Hour => 'h',
            Self::Day => 'd',
            Self::Week => 'w',
            Self::Month => 'm',
            Self::Year => 'y',
        }
    }

    /// Length of one period in seconds, for the units with a fixed length.
    #[must_use]
    pub const fn fixed_seconds(self) -> Option<i64> {
        match self {
            Self::Hour => Some(3600),
            Self::Day => Some(86_400),
            Self::Week => Some(7 * 86_400),
            Self::Month | Self::Year => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_code_round_trips_through_from_code() {
        for granularity in Granularity::iter() {
            let code = granularity.code().to_string();
            assert_eq!(Granularity::from_code(&code).unwrap(), granularity);
        }
    }

    #[test]
    fn test_from_code_rejects_seconds() {
        let err = Granularity::from_code("s").unwrap_err();
        assert_eq!(err, PeriodError::UnsupportedGranularity("s".to_string()));
    }

    #[test]
    fn test_from_code_is_case_sensitive() {
        let _ = Granularity::from_code("W").unwrap_err();
    }

    #[test]
    fn test_display_lowercase() {
        assert_eq!(Granularity::Month.to_string(), "month");
    }

    #[test]
    fn test_fixed_seconds() {
        assert_eq!(Granularity::Hour.fixed_seconds(), Some(3600));
        assert_eq!(Granularity::Day.fixed_seconds(), Some(86_400));
        assert_eq!(Granularity::Month.fixed_seconds(), None);
    }
}
