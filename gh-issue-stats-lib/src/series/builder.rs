use super::{
    CellKey, EndTotal, IntervalSlice, IssueSearch, LabelFilter, Progress, QuerySpec, Scope, ScopeLabelCounts, SearchOutcome,
    StatisticsSeries, TimeWindow,
};
use crate::Result;
use crate::calendar::{PeriodSpec, start_of_current_period, step_back};
use chrono::{DateTime, SecondsFormat, Utc};
use core::sync::atomic::{AtomicU64, Ordering};
use futures_util::future::{try_join_all, try_join3};
use ohno::{EnrichableExt, app_err, bail};
use std::sync::Arc;

const LOG_TARGET: &str = "    series";

/// Everything needed to build a series.
#[derive(Debug, Clone)]
pub struct SeriesRequest {
    /// The instant the newest interval ends at, normally the current time.
    pub reference_now: DateTime<Utc>,
    pub period: PeriodSpec,
    pub interval_count: u32,
    pub scopes: Vec<Scope>,
    pub labels: Vec<LabelFilter>,
}

impl SeriesRequest {
    /// Check the preconditions of [`build_series`].
    pub fn validate(&self) -> Result<()> {
        if self.interval_count == 0 {
            bail!("at least one interval must be requested");
        }

        if self.scopes.is_empty() {
            bail!("at least one scope must be given");
        }

        if self.labels.is_empty() {
            bail!("at least one label must be given");
        }

        Ok(())
    }

    /// Number of searches [`build_series`] issues for this request: `(2N + 1)` per (scope, label) cell.
    #[must_use]
    pub fn required_query_count(&self) -> u64 {
        let cells = (self.scopes.len() as u64).saturating_mul(self.labels.len() as u64);
        (2 * u64::from(self.interval_count) + 1).saturating_mul(cells)
    }

    /// Window of the interval following `newer` (or the newest one when `newer` is `None`).
    fn next_window(&self, newer: Option<&IntervalSlice>) -> Result<TimeWindow> {
        let granularity = self.period.granularity();
        let multiplier = self.period.multiplier();

        let (start, end) = match newer {
            None => {
                let end = self.reference_now;
                let start = start_of_current_period(end, granularity);

                // on an exact period boundary the current period is still empty, report the previous one instead
                let start = if start < end { Some(start) } else { step_back(end, granularity, multiplier) };
                (start, end)
            }
            Some(newer) => {
                let end = newer.window().start();
                (step_back(end, granularity, multiplier), end)
            }
        };

        let start = start.ok_or_else(|| {
            app_err!(
                "the {} period before {} is outside the supported date range",
                self.period,
                end.to_rfc3339_opts(SecondsFormat::Secs, true)
            )
        })?;

        TimeWindow::new(start, end)
    }
}

/// Build the statistics series described by `request`, newest interval first.
///
/// Intervals are built one after the other because each one reads the beginning totals of the
/// previous one. Within an interval, all cells are queried concurrently; `search` is expected to
/// throttle as needed.
///
/// # Errors
///
/// Fails if the request is invalid, if a period boundary falls outside the representable date
/// range, or if any search fails. No partial series is returned.
pub async fn build_series<S: IssueSearch>(request: &SeriesRequest, search: &S, progress: &dyn Progress) -> Result<StatisticsSeries> {
    request.validate()?;

    let total_queries = request.required_query_count();
    let completed = Arc::new(AtomicU64::new(0));

    log::info!(
        target: LOG_TARGET,
        "Collecting {} interval(s) of {} for {} scope(s) and {} label(s), {total_queries} search(es) required",
        request.interval_count,
        request.period,
        request.scopes.len(),
        request.labels.len()
    );

    progress.set_determinate({
        let completed = Arc::clone(&completed);
        Box::new(move || {
            let current = completed.load(Ordering::Relaxed);
            (total_queries, current, format!("{current}/{total_queries} searches"))
        })
    });

    let mut slices: Vec<IntervalSlice> = Vec::with_capacity(request.interval_count as usize);

    for index in 0..request.interval_count {
        progress.set_phase(&format!("Interval {}/{}", index + 1, request.interval_count));

        let window = request.next_window(slices.last())?;
        log::debug!(target: LOG_TARGET, "Interval {index}: {window}");

        let slice = build_slice(request, search, window, slices.last(), &completed).await?;
        slices.push(slice);
    }

    progress.done();

    Ok(StatisticsSeries::new(
        request.period,
        request.scopes.clone(),
        request.labels.clone(),
        slices,
    ))
}

async fn build_slice<S: IssueSearch>(
    request: &SeriesRequest,
    search: &S,
    window: TimeWindow,
    newer: Option<&IntervalSlice>,
    completed: &AtomicU64,
) -> Result<IntervalSlice> {
    let mut cell_futures = Vec::with_capacity(request.scopes.len() * request.labels.len());

    for scope in &request.scopes {
        for label in &request.labels {
            let carried_over = newer
                .map(|slice| {
                    slice
                        .get(scope, label)
                        .map(ScopeLabelCounts::beginning_total)
                        .ok_or_else(|| app_err!("no counts for label '{label}' in scope '{scope}' in the newer interval"))
                })
                .transpose()?;

            cell_futures.push(build_cell(search, scope, label, window, carried_over, completed));
        }
    }

    let cells = try_join_all(cell_futures).await?;
    Ok(IntervalSlice::new(window, cells))
}

async fn build_cell<S: IssueSearch>(
    search: &S,
    scope: &Scope,
    label: &LabelFilter,
    window: TimeWindow,
    carried_over: Option<i64>,
    completed: &AtomicU64,
) -> Result<(CellKey, ScopeLabelCounts)> {
    let end = async {
        match carried_over {
            Some(total) => Ok(EndTotal::CarriedOver(total)),
            None => run_search(search, scope, label, &QuerySpec::open_now(), completed)
                .await
                .map(EndTotal::Queried),
        }
    };
    let created_spec = QuerySpec::created_in(window);
    let closed_spec = QuerySpec::closed_in(window);
    let new = run_search(search, scope, label, &created_spec, completed);
    let closed = run_search(search, scope, label, &closed_spec, completed);

    let (end, new, closed) = try_join3(end, new, closed).await?;
    let counts = ScopeLabelCounts::from_totals(end, new, closed);

    log::debug!(
        target: LOG_TARGET,
        "{scope} {label} {window}: end {}, new {}, closed {}, beginning {}",
        counts.end_total(),
        counts.new_total(),
        counts.closed_total(),
        counts.beginning_total()
    );

    if !counts.is_consistent() {
        log::warn!(
            target: LOG_TARGET,
            "Reconstructed a negative open count for label '{label}' in scope '{scope}' during {window}; search results are inconsistent"
        );
    }

    Ok((CellKey::new(scope.clone(), label.clone()), counts))
}

async fn run_search<S: IssueSearch>(
    search: &S,
    scope: &Scope,
    label: &LabelFilter,
    spec: &QuerySpec,
    completed: &AtomicU64,
) -> Result<SearchOutcome> {
    let outcome = search
        .search(scope, label, spec)
        .await
        .map_err(|e| e.enrich_with(|| format!("searching label '{label}' in scope '{scope}'")))?;

    let _ = completed.fetch_add(1, Ordering::Relaxed);

    if outcome.incomplete {
        log::warn!(target: LOG_TARGET, "Incomplete search results for {}", outcome.url);
    }

    Ok(outcome)
}
