use super::{Granularity, PeriodError};
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PERIOD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<count>\d*)(?P<unit>\D.*)$").expect("period pattern is a valid regex"));

/// A reporting period: a granularity repeated `multiplier` times, written `<multiplier><unit>` (e.g. `2w`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodSpec {
    multiplier: u32,
    granularity: Granularity,
}

impl PeriodSpec {
    pub const fn new(multiplier: u32, granularity: Granularity) -> Result<Self, PeriodError> {
        if multiplier == 0 {
            return Err(PeriodError::InvalidMultiplier(String::new()));
        }

        Ok(Self { multiplier, granularity })
    }

    #[must_use]
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }
}

impl Default for PeriodSpec {
    /// One week.
    fn default() -> Self {
        Self {
            multiplier: 1,
            granularity: Granularity::Week,
        }
    }
}

impl FromStr for PeriodSpec {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PeriodError::Empty);
        }

        let Some(captures) = PERIOD_PATTERN.captures(s) else {
            // all digits, no unit
            return Err(PeriodError::UnsupportedGranularity(String::new()));
        };

        // the unit is checked first so that "s" and "1s" report the same problem
        let granularity = Granularity::from_code(&captures["unit"])?;

        let multiplier = captures["count"]
            .parse::<u32>()
            .ok()
            .filter(|&m| m > 0)
            .ok_or_else(|| PeriodError::InvalidMultiplier(s.to_string()))?;

        Ok(Self { multiplier, granularity })
    }
}

impl TryFrom<String> for PeriodSpec {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodSpec> for String {
    fn from(value: PeriodSpec) -> Self {
        value.to_string()
    }
}

impl Display for PeriodSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.multiplier, self.granularity.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_digit() {
        let spec: PeriodSpec = "1w".parse().unwrap();
        assert_eq!(spec.multiplier(), 1);
        assert_eq!(spec.granularity(), Granularity::Week);
    }

    #[test]
    fn test_parse_multi_digit() {
        let spec: PeriodSpec = "12h".parse().unwrap();
        assert_eq!(spec.multiplier(), 12);
        assert_eq!(spec.granularity(), Granularity::Hour);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let spec: PeriodSpec = " 3m ".parse().unwrap();
        assert_eq!(spec, PeriodSpec::new(3, Granularity::Month).unwrap());
    }

    #[test]
    fn test_parse_unsupported_unit() {
        assert_eq!(
            "1s".parse::<PeriodSpec>().unwrap_err(),
            PeriodError::UnsupportedGranularity("s".to_string())
        );
    }

    #[test]
    fn test_parse_unit_without_multiplier() {
        assert!(matches!("w".parse::<PeriodSpec>().unwrap_err(), PeriodError::InvalidMultiplier(_)));
    }

    #[test]
    fn test_parse_zero_multiplier() {
        assert!(matches!("0d".parse::<PeriodSpec>().unwrap_err(), PeriodError::InvalidMultiplier(_)));
    }

    #[test]
    fn test_parse_overflowing_multiplier() {
        assert!(matches!(
            "99999999999d".parse::<PeriodSpec>().unwrap_err(),
            PeriodError::InvalidMultiplier(_)
        ));
    }

    #[test]
    fn test_parse_digits_only() {
        assert!(matches!("7".parse::<PeriodSpec>().unwrap_err(), PeriodError::UnsupportedGranularity(_)));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!("".parse::<PeriodSpec>().unwrap_err(), PeriodError::Empty);
    }

    #[test]
    fn test_parse_long_unit_is_unsupported() {
        assert_eq!(
            "1week".parse::<PeriodSpec>().unwrap_err(),
            PeriodError::UnsupportedGranularity("week".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(PeriodSpec::new(2, Granularity::Week).unwrap().to_string(), "2w");
    }

    #[test]
    fn test_new_rejects_zero() {
        let _ = PeriodSpec::new(0, Granularity::Day).unwrap_err();
    }

    #[test]
    fn test_deserialize_from_toml_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            period: PeriodSpec,
        }

        let wrapper: Wrapper = toml::from_str(r#"period = "6m""#).unwrap();
        assert_eq!(wrapper.period, PeriodSpec::new(6, Granularity::Month).unwrap());

        let err = toml::from_str::<Wrapper>(r#"period = "6q""#).map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("unsupported granularity"));
    }
}
