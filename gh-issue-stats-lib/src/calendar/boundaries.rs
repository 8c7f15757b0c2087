use super::Granularity;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc, Weekday};

/// Truncate `now` to the start of the period of the given granularity that contains it.
///
/// Weeks start on Monday. Sub-second precision is dropped.
#[must_use]
pub fn start_of_current_period(now: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    let date = now.date_naive();

    match granularity {
        Granularity::Hour => midnight(date) + TimeDelta::hours(i64::from(now.hour())),
        Granularity::Day => midnight(date),
        Granularity::Week => midnight(date.week(Weekday::Mon).first_day()),
        Granularity::Month => midnight(date - Days::new(u64::from(date.day0()))),
        Granularity::Year => midnight(date - Days::new(u64::from(date.ordinal0()))),
    }
}

/// Move a period boundary back by `multiplier` periods, keeping its time of day.
///
/// Hours, days, and weeks are fixed-length steps. Months and years are calendar steps: when the
/// target month is shorter than the source day, the day is clamped to the month's last day
/// (March 31 steps back to February 28 or 29, and February 29 steps back a year to February 28).
///
/// Returns `None` when the result would fall outside the representable range.
#[must_use]
pub fn step_back(timestamp: DateTime<Utc>, granularity: Granularity, multiplier: u32) -> Option<DateTime<Utc>> {
    if let Some(seconds) = granularity.fixed_seconds() {
        let delta = TimeDelta::try_seconds(seconds.checked_mul(i64::from(multiplier))?)?;
        return timestamp.checked_sub_signed(delta);
    }

    let months = match granularity {
        Granularity::Year => multiplier.checked_mul(12)?,
        _ => multiplier,
    };

    timestamp.checked_sub_months(Months::new(months))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
