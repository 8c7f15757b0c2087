use crate::calendar::Granularity;
use crate::series::ScopeLabelCounts;
use chrono::{DateTime, Utc};

/// Marker appended to cells whose search results were incomplete.
pub const INCOMPLETE_MARKER: &str = "*";

/// Marker appended to cells whose reconstructed open count went negative.
pub const INCONSISTENT_MARKER: &str = "!";

pub const INCOMPLETE_FOOTNOTE: &str = "GitHub reported incomplete search results, counts may be too low";
pub const INCONSISTENT_FOOTNOTE: &str = "search results disagree, an open count was reconstructed as negative";

/// Human name of the interval at `index` (0 is the current one).
pub fn period_name(granularity: Granularity, index: usize) -> String {
    let (current, previous, plural) = match granularity {
        Granularity::Hour => ("Now", "1 hour ago", "hours"),
        Granularity::Day => ("Today", "Yesterday", "days"),
        Granularity::Week => ("This week", "Last week", "weeks"),
        Granularity::Month => ("This month", "Last month", "months"),
        Granularity::Year => ("This year", "Last year", "years"),
    };

    match index {
        0 => current.to_string(),
        1 => previous.to_string(),
        _ => format!("{index} {plural} ago"),
    }
}

/// Start of an interval, at the precision of its granularity.
pub fn period_date(granularity: Granularity, start: DateTime<Utc>) -> String {
    let format = match granularity {
        Granularity::Hour => "%Y-%m-%d %H:00",
        Granularity::Day | Granularity::Week => "%Y-%m-%d",
        Granularity::Month => "%Y-%m",
        Granularity::Year => "%Y",
    };

    start.format(format).to_string()
}

pub fn difference(counts: &ScopeLabelCounts) -> String {
    format!("+{}, -{}", counts.new_total(), counts.closed_total())
}

/// Markers for a cell, in a fixed order.
pub fn markers(counts: &ScopeLabelCounts) -> String {
    let mut s = String::new();
    if counts.has_incomplete_results() {
        s.push_str(INCOMPLETE_MARKER);
    }
    if !counts.is_consistent() {
        s.push_str(INCONSISTENT_MARKER);
    }
    s
}
