// CutoffScout - core/predicate.rs
//
// Per-field predicates and the fail-open wrapper that combines them.
//
// Every predicate is a pure function of one filter setting and one record.
// A record whose fields have the wrong shape is never dropped because of
// it: the evaluation is tagged `DefaultedToMatch` and the error goes to the
// caller-supplied DiagnosticSink.

use crate::core::filter::FilterState;
use crate::core::model::{is_falsy, Cell, CutoffRange, Quota, Record};
use crate::util::constants;
use crate::util::error::PredicateError;
use std::collections::BTreeSet;

// =============================================================================
// Primitive predicates
// =============================================================================

/// Inclusive containment on an already-normalised `(low, high)` pair.
pub fn range_contains(value: f64, low: f64, high: f64) -> bool {
    low <= value && value <= high
}

/// Case-insensitive substring match of `needle_lower` in the cell's string form.
///
/// `needle_lower` must already be lowercase. An empty needle matches without
/// looking at the cell. A null or non-scalar field under a non-empty needle is
/// a shape error.
pub fn text_matches(
    cell: &Cell,
    needle_lower: &str,
    field: &'static str,
) -> Result<bool, PredicateError> {
    if needle_lower.is_empty() {
        return Ok(true);
    }
    let text = match cell {
        Cell::Null | Cell::Other(_) => None,
        _ => cell.as_text(),
    }
    .ok_or_else(|| PredicateError::NotText {
        field,
        found: cell.describe(),
    })?;
    Ok(text.to_lowercase().contains(needle_lower))
}

/// Membership of the record's branch code in the selected set (empty = all).
pub fn branch_matches(cell: &Cell, codes: &BTreeSet<String>) -> Result<bool, PredicateError> {
    if codes.is_empty() {
        return Ok(true);
    }
    let code = cell.as_text().ok_or_else(|| PredicateError::NotText {
        field: "brc",
        found: cell.describe(),
    })?;
    Ok(codes.contains(&*code))
}

/// Numeric value of a cutoff cell. `None` means missing, null, empty or NaN.
///
/// Cutoffs are numbers. Any non-empty string, numeric-looking or not, is a
/// shape error, as is any non-scalar value.
pub fn cutoff_value(cell: &Cell, quota: Quota) -> Result<Option<f64>, PredicateError> {
    match cell {
        Cell::Null => Ok(None),
        Cell::Number(n) if n.is_nan() => Ok(None),
        Cell::Number(n) => Ok(Some(*n)),
        Cell::Text(s) if s.is_empty() => Ok(None),
        Cell::Text(_) | Cell::Other(_) => Err(PredicateError::NotNumeric {
            field: quota.name(),
            found: cell.describe(),
        }),
    }
}

/// Range predicate for one quota.
///
/// Inactive (sentinel) ranges match everything without inspecting the cell.
/// An active range never matches a missing or zero cutoff, even when the
/// range nominally includes zero.
pub fn range_matches(cell: &Cell, range: CutoffRange, quota: Quota) -> Result<bool, PredicateError> {
    if range.is_inactive() {
        return Ok(true);
    }
    let (low, high) = range.bounds();
    match cutoff_value(cell, quota)? {
        Some(v) if !is_falsy(v) => Ok(range_contains(v, low, high)),
        _ => Ok(false),
    }
}

// =============================================================================
// Outcome and diagnostics
// =============================================================================

/// Result of evaluating all filters against one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Match,
    NoMatch,
    /// A field could not be evaluated; the record is kept.
    DefaultedToMatch(PredicateError),
}

impl Outcome {
    /// Whether the record belongs in the filtered view.
    pub fn keeps(&self) -> bool {
        !matches!(self, Outcome::NoMatch)
    }
}

/// Receives per-record evaluation failures.
pub trait DiagnosticSink {
    fn report(&mut self, index: usize, record: &Record, error: &PredicateError);
}

/// Sink that emits a `tracing` warning per failure.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, index: usize, record: &Record, error: &PredicateError) {
        tracing::warn!(
            index,
            college_code = %record.college_code,
            branch_code = %record.branch_code,
            error = %error,
            "Record could not be evaluated; keeping it in the view"
        );
    }
}

/// Sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _index: usize, _record: &Record, _error: &PredicateError) {}
}

/// One retained per-record failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Position of the record in the dataset.
    pub index: usize,
    pub error: PredicateError,
}

/// Sink that keeps failures in memory, up to `MAX_RETAINED_DIAGNOSTICS`.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
    /// Total failures reported, including ones past the retention cap.
    pub total: usize,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, index: usize, _record: &Record, error: &PredicateError) {
        self.total += 1;
        if self.diagnostics.len() < constants::MAX_RETAINED_DIAGNOSTICS {
            self.diagnostics.push(Diagnostic {
                index,
                error: error.clone(),
            });
        }
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// A filter state prepared for repeated evaluation (lowercased needles).
#[derive(Debug)]
pub struct PredicateEvaluator<'a> {
    state: &'a FilterState,
    name_lower: String,
    code_lower: String,
}

impl<'a> PredicateEvaluator<'a> {
    pub fn new(state: &'a FilterState) -> Self {
        Self {
            state,
            name_lower: state.college_name.to_lowercase(),
            code_lower: state.college_code.to_lowercase(),
        }
    }

    /// Evaluate all twelve predicates in order, stopping at the first
    /// non-match or the first shape error.
    pub fn evaluate(&self, record: &Record) -> Outcome {
        match self.matches_all(record) {
            Ok(true) => Outcome::Match,
            Ok(false) => Outcome::NoMatch,
            Err(e) => Outcome::DefaultedToMatch(e),
        }
    }

    /// Evaluate and report any failure to `sink`. Returns whether to keep the record.
    pub fn keep(&self, index: usize, record: &Record, sink: &mut dyn DiagnosticSink) -> bool {
        let outcome = self.evaluate(record);
        if let Outcome::DefaultedToMatch(ref error) = outcome {
            sink.report(index, record, error);
        }
        outcome.keeps()
    }

    fn matches_all(&self, record: &Record) -> Result<bool, PredicateError> {
        if !text_matches(&record.college_name, &self.name_lower, "con")? {
            return Ok(false);
        }
        if !text_matches(&record.college_code, &self.code_lower, "coc")? {
            return Ok(false);
        }
        if !branch_matches(&record.branch_code, &self.state.branch_codes)? {
            return Ok(false);
        }
        for (quota, range) in self.state.ranges() {
            if !range_matches(record.cutoff(quota), range, quota)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::FilterUpdate;

    fn record(code: Cell, name: &str, branch: &str) -> Record {
        Record {
            college_code: code,
            college_name: name.into(),
            branch_code: branch.into(),
            branch_name: "Branch".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_range_contains_inclusive() {
        assert!(range_contains(190.0, 190.0, 200.0));
        assert!(range_contains(200.0, 190.0, 200.0));
        assert!(!range_contains(189.99, 190.0, 200.0));
    }

    #[test]
    fn test_text_matches_numeric_cell() {
        let cell = Cell::Number(1123.0);
        assert!(text_matches(&cell, "12", "coc").unwrap());
        assert!(!text_matches(&cell, "99", "coc").unwrap());
    }

    #[test]
    fn test_text_matches_empty_needle_skips_shape_check() {
        let cell = Cell::Other(serde_json::json!([1]));
        assert!(text_matches(&cell, "", "con").unwrap());
        assert!(text_matches(&cell, "x", "con").is_err());
    }

    #[test]
    fn test_branch_matches() {
        let codes = BTreeSet::from(["CS".to_string(), "ME".to_string()]);
        assert!(branch_matches(&"CS".into(), &codes).unwrap());
        assert!(!branch_matches(&"EE".into(), &codes).unwrap());
        assert!(!branch_matches(&Cell::Null, &codes).unwrap());
        assert!(branch_matches(&"EE".into(), &BTreeSet::new()).unwrap());
    }

    #[test]
    fn test_range_matches_excludes_missing_and_zero() {
        let range = CutoffRange::new(0.0, 200.0);
        assert!(!range_matches(&Cell::Null, range, Quota::Sc).unwrap());
        assert!(!range_matches(&Cell::Number(0.0), range, Quota::Sc).unwrap());
        assert!(range_matches(&Cell::Number(10.0), range, Quota::Sc).unwrap());
    }

    #[test]
    fn test_range_matches_sentinel_ignores_cell() {
        let bad = Cell::Other(serde_json::json!({"x": 1}));
        assert!(range_matches(&bad, CutoffRange::INACTIVE, Quota::St).unwrap());
        assert!(range_matches(&Cell::Null, CutoffRange::INACTIVE, Quota::St).unwrap());
    }

    #[test]
    fn test_range_matches_reversed_pair() {
        let cell = Cell::Number(195.0);
        assert!(range_matches(&cell, CutoffRange::new(200.0, 190.0), Quota::Oc).unwrap());
    }

    #[test]
    fn test_text_matches_null_field_is_shape_error() {
        assert!(text_matches(&Cell::Null, "", "con").unwrap());
        assert_eq!(
            text_matches(&Cell::Null, "abc", "con"),
            Err(PredicateError::NotText {
                field: "con",
                found: "null".to_string()
            })
        );
    }

    #[test]
    fn test_cutoff_value_rejects_strings() {
        assert_eq!(cutoff_value(&Cell::Number(187.5), Quota::Bc).unwrap(), Some(187.5));
        assert_eq!(cutoff_value(&"".into(), Quota::Bc).unwrap(), None);
        assert!(matches!(
            cutoff_value(&"187.5".into(), Quota::Bc),
            Err(PredicateError::NotNumeric { field: "BC", .. })
        ));
        assert!(matches!(
            cutoff_value(&"n/a".into(), Quota::Bc),
            Err(PredicateError::NotNumeric { field: "BC", .. })
        ));
    }

    #[test]
    fn test_null_college_name_is_kept_and_reported() {
        let mut r = record("1".into(), "ABC College", "CS");
        r.college_name = Cell::Null;
        let state = FilterState::unfiltered().with(FilterUpdate::CollegeName("abc".to_string()));
        let mut sink = CollectingSink::new();
        assert!(PredicateEvaluator::new(&state).keep(0, &r, &mut sink));
        assert_eq!(sink.total, 1);
    }

    #[test]
    fn test_string_cutoff_is_kept_and_reported() {
        let mut r = record("1".into(), "ABC College", "CS");
        r.oc = "150".into();
        r.bc = Cell::Number(190.0);
        let mut sink = CollectingSink::new();
        assert!(PredicateEvaluator::new(&FilterState::default()).keep(3, &r, &mut sink));
        assert_eq!(
            sink.diagnostics[0].error,
            PredicateError::NotNumeric {
                field: "OC",
                found: "\"150\"".to_string()
            }
        );
    }

    #[test]
    fn test_evaluate_defaults_to_match_on_shape_error() {
        let mut r = record("1".into(), "ABC College", "CS");
        r.oc = Cell::Text("n/a".to_string());
        let state = FilterState::default();
        let outcome = PredicateEvaluator::new(&state).evaluate(&r);
        assert!(matches!(outcome, Outcome::DefaultedToMatch(_)));
        assert!(outcome.keeps());
    }

    #[test]
    fn test_keep_reports_to_sink() {
        let mut r = record("1".into(), "ABC College", "CS");
        r.oc = Cell::Other(serde_json::json!(true));
        let state = FilterState::default();
        let mut sink = CollectingSink::new();
        assert!(PredicateEvaluator::new(&state).keep(7, &r, &mut sink));
        assert_eq!(sink.total, 1);
        assert_eq!(sink.diagnostics[0].index, 7);
    }

    #[test]
    fn test_earlier_non_match_wins_over_later_error() {
        let mut r = record("1".into(), "ABC College", "CS");
        r.oc = Cell::Other(serde_json::json!(true));
        let state =
            FilterState::default().with(FilterUpdate::CollegeName("xyz".to_string()));
        assert_eq!(PredicateEvaluator::new(&state).evaluate(&r), Outcome::NoMatch);
    }
}
