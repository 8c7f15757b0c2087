use super::common;
use crate::Result;
use crate::series::{LabelFilter, Scope, StatisticsSeries};
use core::fmt::Write;

pub fn generate<W: Write>(series: &StatisticsSeries, writer: &mut W) -> Result<()> {
    let granularity = series.period().granularity();

    for (scope_index, scope) in series.scopes().iter().enumerate() {
        if scope_index > 0 {
            writeln!(writer)?;
        }

        writeln!(writer, "### {}", escape(&scope.to_string()))?;
        writeln!(writer)?;

        write!(writer, "| period |")?;
        for label in series.labels() {
            write!(writer, " {} |", header_label(series, scope, label))?;
        }
        writeln!(writer)?;

        write!(writer, "| :---: |")?;
        for _ in series.labels() {
            write!(writer, " :---: |")?;
        }
        writeln!(writer)?;

        for (index, slice) in series.slices().iter().enumerate() {
            write!(
                writer,
                "| **{}** <br>({}) |",
                common::period_name(granularity, series.periods_ago(index)),
                common::period_date(granularity, slice.window().start())
            )?;

            for label in series.labels() {
                match slice.get(scope, label) {
                    Some(counts) => write!(
                        writer,
                        " **{}** <br>({}){} |",
                        counts.end_total(),
                        common::difference(counts),
                        common::markers(counts).replace('*', "\\*")
                    )?,
                    None => write!(writer, " n/a |")?,
                }
            }
            writeln!(writer)?;
        }
    }

    if series.cells_with_warnings() > 0 || series.inconsistent_cells() > 0 {
        writeln!(writer)?;
    }

    if series.cells_with_warnings() > 0 {
        writeln!(writer, "\\{} {}  ", common::INCOMPLETE_MARKER, common::INCOMPLETE_FOOTNOTE)?;
    }

    if series.inconsistent_cells() > 0 {
        writeln!(writer, "{} {}  ", common::INCONSISTENT_MARKER, common::INCONSISTENT_FOOTNOTE)?;
    }

    Ok(())
}

/// Label name linked to the search listing the label's currently open items.
fn header_label(series: &StatisticsSeries, scope: &Scope, label: &LabelFilter) -> String {
    let text = escape(&label.to_string());

    series
        .slices()
        .first()
        .and_then(|slice| slice.get(scope, label))
        .and_then(|counts| counts.end_total_url())
        .map_or_else(|| text.clone(), |url| format!("[{text}]({url})"))
}

fn escape(s: &str) -> String {
    s.replace('|', "\\|").replace('[', "\\[").replace(']', "\\]")
}
