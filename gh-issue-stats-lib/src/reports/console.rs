use super::common;
use crate::Result;
use crate::series::StatisticsSeries;
use core::fmt::Write;
use owo_colors::OwoColorize;

const COLUMN_GAP: &str = "   ";

struct Cell {
    text: String,
    negative: bool,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            negative: false,
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn generate<W: Write>(series: &StatisticsSeries, use_colors: bool, writer: &mut W) -> Result<()> {
    let granularity = series.period().granularity();

    for (scope_index, scope) in series.scopes().iter().enumerate() {
        if scope_index > 0 {
            writeln!(writer)?;
        }

        let title = scope.to_string();
        if use_colors {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{title}")?;
        }
        writeln!(writer)?;

        let header: Vec<Cell> = core::iter::once(Cell::plain("period"))
            .chain(series.labels().iter().map(|label| Cell::plain(label.to_string())))
            .collect();

        let mut rows = Vec::with_capacity(series.len());
        for (index, slice) in series.slices().iter().enumerate() {
            let name = format!(
                "{} ({})",
                common::period_name(granularity, series.periods_ago(index)),
                common::period_date(granularity, slice.window().start())
            );

            let mut row = vec![Cell::plain(name)];
            for label in series.labels() {
                row.push(slice.get(scope, label).map_or_else(
                    || Cell::plain("n/a"),
                    |counts| Cell {
                        text: format!("{} ({}){}", counts.end_total(), common::difference(counts), common::markers(counts)),
                        negative: !counts.is_consistent(),
                    },
                ));
            }
            rows.push(row);
        }

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                core::iter::once(&header)
                    .chain(rows.iter())
                    .filter_map(|row| row.get(col).map(Cell::width))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write_row(writer, &header, &widths, use_colors, true)?;

        let rule_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);
        writeln!(writer, "{}", "─".repeat(rule_width))?;

        for row in &rows {
            write_row(writer, row, &widths, use_colors, false)?;
        }
    }

    write_footnotes(series, writer)?;

    Ok(())
}

fn write_row<W: Write>(writer: &mut W, row: &[Cell], widths: &[usize], use_colors: bool, is_header: bool) -> Result<()> {
    let mut line = String::new();

    for (col, (cell, &width)) in row.iter().zip(widths).enumerate() {
        if col > 0 {
            line.push_str(COLUMN_GAP);
        }

        // pad before coloring so escape sequences don't count toward the width
        let padded = if col + 1 == row.len() {
            cell.text.clone()
        } else {
            format!("{:<width$}", cell.text)
        };

        if use_colors && is_header {
            write!(line, "{}", padded.bold())?;
        } else if use_colors && cell.negative {
            write!(line, "{}", padded.red())?;
        } else {
            line.push_str(&padded);
        }
    }

    writeln!(writer, "{line}")?;
    Ok(())
}

fn write_footnotes<W: Write>(series: &StatisticsSeries, writer: &mut W) -> Result<()> {
    let incomplete = series.cells_with_warnings() > 0;
    let inconsistent = series.inconsistent_cells() > 0;

    if incomplete || inconsistent {
        writeln!(writer)?;
    }

    if incomplete {
        writeln!(writer, "{} {}", common::INCOMPLETE_MARKER, common::INCOMPLETE_FOOTNOTE)?;
    }

    if inconsistent {
        writeln!(writer, "{} {}", common::INCONSISTENT_MARKER, common::INCONSISTENT_FOOTNOTE)?;
    }

    Ok(())
}
