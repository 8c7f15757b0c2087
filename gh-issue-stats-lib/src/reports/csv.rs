use super::common;
use crate::Result;
use crate::series::StatisticsSeries;
use chrono::SecondsFormat;
use core::fmt::Write;
use std::borrow::Cow;

pub fn generate<W: Write>(series: &StatisticsSeries, writer: &mut W) -> Result<()> {
    let granularity = series.period().granularity();

    writeln!(
        writer,
        "scope,label,index,period,start,end,end_total,new_total,closed_total,beginning_total,incomplete"
    )?;

    for (index, slice) in series.slices().iter().enumerate() {
        let window = slice.window();
        let period = common::period_name(granularity, series.periods_ago(index));
        let start = window.start().to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = window.end().to_rfc3339_opts(SecondsFormat::Secs, true);

        for scope in series.scopes() {
            for label in series.labels() {
                let Some(counts) = slice.get(scope, label) else {
                    continue;
                };

                writeln!(
                    writer,
                    "{},{},{index},{},{start},{end},{},{},{},{},{}",
                    escape_csv(&scope.to_string()),
                    escape_csv(&label.to_string()),
                    escape_csv(&period),
                    counts.end_total(),
                    counts.new_total(),
                    counts.closed_total(),
                    counts.beginning_total(),
                    counts.has_incomplete_results()
                )?;
            }
        }
    }

    Ok(())
}

/// Escape a value for RFC compliant CSV output.
///
/// Wraps the value in double quotes if it contains commas, newlines, or double quotes.
/// Internal double quotes are doubled per the RFC.
fn escape_csv(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else if s.contains(',') || s.contains('\n') || s.contains('\r') {
        Cow::Owned(format!("\"{s}\""))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_series;

    #[test]
    fn test_generate_rows() {
        let mut output = String::new();
        generate(&sample_series(), &mut output).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[1],
            "atom/atom,issues,0,Today,2024-05-17T00:00:00Z,2024-05-17T14:30:00Z,10,2,1,9,false"
        );
        assert_eq!(
            lines[4],
            "atom/atom,bug,1,Yesterday,2024-05-16T00:00:00Z,2024-05-17T00:00:00Z,5,1,0,4,false"
        );
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
    }
}
