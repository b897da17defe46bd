// CutoffScout - core/query.rs
//
// Query engine: applies the combined predicate set across the dataset.
//
// Every run recomputes from scratch (O(records x 12), no indexing) and
// returns indices into the dataset in their original order. Callers
// materialise records as they need them.
//
// Recovery policy for whole-run failures: keep the last good view and
// flag it stale. Before the first successful run the last good view is
// the whole dataset.

use crate::core::filter::FilterState;
use crate::core::model::{Quota, Record};
use crate::core::predicate::{DiagnosticSink, PredicateEvaluator};
use crate::util::error::{FilterError, PredicateError};

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Records that cannot be evaluated are kept and reported to `sink`.
pub fn apply_filters(
    records: &[Record],
    state: &FilterState,
    sink: &mut dyn DiagnosticSink,
) -> Vec<usize> {
    if state.is_empty() {
        return (0..records.len()).collect();
    }

    let evaluator = PredicateEvaluator::new(state);

    records
        .iter()
        .enumerate()
        .filter(|(idx, record)| evaluator.keep(*idx, record, sink))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check that every active range can be compared.
///
/// This is the only state-level failure: a range whose bounds are not
/// finite numbers (a NaN paired with a real bound, or an infinity).
/// Open-ended ranges such as `(190, inf)` are rejected too, so every active
/// range has two real bounds; use `(190, 200)` instead.
pub fn validate(state: &FilterState) -> Result<(), FilterError> {
    for (quota, range) in state.active_ranges() {
        if !range.low.is_finite() || !range.high.is_finite() {
            return Err(invalid_range(quota, range.low, range.high));
        }
    }
    Ok(())
}

fn invalid_range(quota: Quota, low: f64, high: f64) -> FilterError {
    FilterError::InvalidRange {
        quota: quota.name(),
        low,
        high,
    }
}

/// [`validate`] then [`apply_filters`].
pub fn try_apply_filters(
    records: &[Record],
    state: &FilterState,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<usize>, FilterError> {
    validate(state)?;
    Ok(apply_filters(records, state, sink))
}

/// Summary of the most recent run.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRun {
    /// Records in the dataset.
    pub total: usize,
    /// Records in the view.
    pub matched: usize,
    /// Records kept only because they could not be evaluated.
    pub defaulted: usize,
    /// Whether the view is a leftover from an earlier run.
    pub stale: bool,
}

/// Forwards to an inner sink while counting.
struct CountingSink<'s> {
    inner: &'s mut dyn DiagnosticSink,
    count: usize,
}

impl DiagnosticSink for CountingSink<'_> {
    fn report(&mut self, index: usize, record: &Record, error: &PredicateError) {
        self.count += 1;
        self.inner.report(index, record, error);
    }
}

/// Holds the current filtered view and applies the recovery policy.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    view: Vec<usize>,
    last_run: FilterRun,
    last_error: Option<FilterError>,
}

impl QueryEngine {
    /// Start with the unfiltered view over `record_count` records.
    pub fn new(record_count: usize) -> Self {
        Self {
            view: (0..record_count).collect(),
            last_run: FilterRun {
                total: record_count,
                matched: record_count,
                defaulted: 0,
                stale: false,
            },
            last_error: None,
        }
    }

    /// Recompute the view for `state`.
    ///
    /// On success the view is replaced. On failure the previous view is kept
    /// and marked stale; the error is logged and retained in
    /// [`QueryEngine::last_error`]. Never returns an error to the caller.
    pub fn run(
        &mut self,
        records: &[Record],
        state: &FilterState,
        sink: &mut dyn DiagnosticSink,
    ) -> &FilterRun {
        let mut counting = CountingSink {
            inner: sink,
            count: 0,
        };

        match try_apply_filters(records, state, &mut counting) {
            Ok(indices) => {
                self.last_run = FilterRun {
                    total: records.len(),
                    matched: indices.len(),
                    defaulted: counting.count,
                    stale: false,
                };
                self.view = indices;
                self.last_error = None;
                tracing::debug!(
                    total = self.last_run.total,
                    matched = self.last_run.matched,
                    defaulted = self.last_run.defaulted,
                    "Filter run complete"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, kept = self.view.len(), "Filter run failed; keeping last good view");
                self.last_run.stale = true;
                self.last_error = Some(e);
            }
        }
        &self.last_run
    }

    /// Indices of the records in the current view.
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    /// Records of the current view, in dataset order.
    pub fn records<'r>(&'r self, records: &'r [Record]) -> impl Iterator<Item = &'r Record> + 'r {
        self.view.iter().filter_map(move |&i| records.get(i))
    }

    pub fn last_run(&self) -> &FilterRun {
        &self.last_run
    }

    /// Whether the view predates the current filter state.
    pub fn is_stale(&self) -> bool {
        self.last_run.stale
    }

    /// The error that made the view stale, if any.
    pub fn last_error(&self) -> Option<&FilterError> {
        self.last_error.as_ref()
    }
}
