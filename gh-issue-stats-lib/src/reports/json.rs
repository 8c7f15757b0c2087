use super::common;
use crate::Result;
use crate::series::{ScopeLabelCounts, StatisticsSeries};
use chrono::SecondsFormat;
use core::fmt::Write;
use serde_json::json;

#[expect(unused_results, reason = "Map::insert returns the previous value, which is always None here")]
pub fn generate<W: Write>(series: &StatisticsSeries, writer: &mut W) -> Result<()> {
    let granularity = series.period().granularity();
    let mut intervals = Vec::with_capacity(series.len());

    for (index, slice) in series.slices().iter().enumerate() {
        let window = slice.window();

        let mut interval_obj = serde_json::Map::new();
        interval_obj.insert("index".to_string(), json!(index));
        interval_obj.insert("name".to_string(), json!(common::period_name(granularity, series.periods_ago(index))));
        interval_obj.insert("start".to_string(), json!(window.start().to_rfc3339_opts(SecondsFormat::Secs, true)));
        interval_obj.insert("end".to_string(), json!(window.end().to_rfc3339_opts(SecondsFormat::Secs, true)));

        let mut cells = Vec::new();
        for scope in series.scopes() {
            for label in series.labels() {
                if let Some(counts) = slice.get(scope, label) {
                    let mut cell_obj = counts_to_json(counts);
                    cell_obj.insert("scope".to_string(), json!(scope.to_string()));
                    cell_obj.insert("label".to_string(), json!(label.to_string()));
                    cells.push(json!(cell_obj));
                }
            }
        }

        interval_obj.insert("cells".to_string(), json!(cells));
        intervals.push(json!(interval_obj));
    }

    let output = json!({
        "period": series.period().to_string(),
        "scopes": series.scopes().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "labels": series.labels().iter().map(ToString::to_string).collect::<Vec<_>>(),
        "intervals": intervals,
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[expect(unused_results, reason = "Map::insert returns the previous value, which is always None here")]
fn counts_to_json(counts: &ScopeLabelCounts) -> serde_json::Map<String, serde_json::Value> {
    let mut obj = serde_json::Map::new();
    obj.insert("end_total".to_string(), json!(counts.end_total()));
    obj.insert("new_total".to_string(), json!(counts.new_total()));
    obj.insert("closed_total".to_string(), json!(counts.closed_total()));
    obj.insert("beginning_total".to_string(), json!(counts.beginning_total()));

    let mut urls = serde_json::Map::new();
    if let Some(url) = counts.end_total_url() {
        urls.insert("open".to_string(), json!(url.as_str()));
    }
    urls.insert("new".to_string(), json!(counts.new_total_url().as_str()));
    urls.insert("closed".to_string(), json!(counts.closed_total_url().as_str()));
    obj.insert("urls".to_string(), json!(urls));

    obj.insert(
        "warnings".to_string(),
        json!(counts.warnings().iter().map(ToString::to_string).collect::<Vec<_>>()),
    );

    obj
}
