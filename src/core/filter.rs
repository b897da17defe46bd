// CutoffScout - core/filter.rs
//
// Filter settings for the cutoff table.
// All active filters are AND-combined by the query engine.
// Core layer: pure data, no I/O or UI dependencies.

use crate::core::model::{CutoffRange, Quota};
use crate::core::reset::{self, ResetAction};
use crate::util::constants;
use std::collections::BTreeSet;

/// Complete filter state.
///
/// A plain value: the UI writes it field by field, the query engine reads
/// it. Nothing is validated on write; reversed ranges are normalised when
/// evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Case-insensitive substring on the college name. Empty = no filter.
    pub college_name: String,

    /// Case-insensitive substring on the college code. Empty = no filter.
    pub college_code: String,

    /// Allowed branch codes (empty = all).
    pub branch_codes: BTreeSet<String>,

    /// One range per quota, indexed by [`Quota::index`].
    ranges: [CutoffRange; 9],
}

/// A single-field write coming from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    CollegeName(String),
    CollegeCode(String),
    BranchCodes(BTreeSet<String>),
    Range(Quota, CutoffRange),
}

impl Default for FilterState {
    /// The literal session-start state: OC 190-200, BC 185-200, the rest off.
    fn default() -> Self {
        let mut ranges = [CutoffRange::INACTIVE; 9];
        ranges[Quota::Oc.index()] = constants::DEFAULT_OC_RANGE.into();
        ranges[Quota::Bc.index()] = constants::DEFAULT_BC_RANGE.into();
        Self {
            college_name: String::new(),
            college_code: String::new(),
            branch_codes: BTreeSet::new(),
            ranges,
        }
    }
}

impl FilterState {
    /// A state with every filter switched off, including OC and BC.
    pub fn unfiltered() -> Self {
        Self {
            ranges: [CutoffRange::INACTIVE; 9],
            ..Self::default()
        }
    }

    /// Store one field, leaving every other field untouched.
    pub fn set(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::CollegeName(text) => self.college_name = text,
            FilterUpdate::CollegeCode(text) => self.college_code = text,
            FilterUpdate::BranchCodes(codes) => self.branch_codes = codes,
            FilterUpdate::Range(quota, range) => self.ranges[quota.index()] = range,
        }
    }

    /// Builder-style [`FilterState::set`].
    pub fn with(mut self, update: FilterUpdate) -> Self {
        self.set(update);
        self
    }

    /// Switch off one range filter.
    pub fn reset_range(&mut self, quota: Quota) {
        reset::apply(self, ResetAction::Range(quota));
    }

    /// Restore the literal default state.
    pub fn reset_all(&mut self) {
        reset::apply(self, ResetAction::All);
    }

    /// The stored (possibly reversed) range for one quota.
    pub fn range(&self, quota: Quota) -> CutoffRange {
        self.ranges[quota.index()]
    }

    /// All nine ranges paired with their quota, in column order.
    pub fn ranges(&self) -> impl Iterator<Item = (Quota, CutoffRange)> + '_ {
        Quota::ALL.iter().map(move |&q| (q, self.ranges[q.index()]))
    }

    /// Ranges that currently constrain the view.
    pub fn active_ranges(&self) -> impl Iterator<Item = (Quota, CutoffRange)> + '_ {
        self.ranges().filter(|(_, r)| !r.is_inactive())
    }

    /// Returns true if the state equals the session-start default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true if no filter of any kind is active.
    pub fn is_empty(&self) -> bool {
        self.college_name.is_empty()
            && self.college_code.is_empty()
            && self.branch_codes.is_empty()
            && self.active_ranges().next().is_none()
    }

    /// Number of filters currently constraining the view.
    pub fn active_filter_count(&self) -> usize {
        usize::from(!self.college_name.is_empty())
            + usize::from(!self.college_code.is_empty())
            + usize::from(!self.branch_codes.is_empty())
            + self.active_ranges().count()
    }

    /// Slider caption, e.g. `"OC - Between 190 - 200"`.
    pub fn describe_range(&self, quota: Quota) -> String {
        format!("{quota} - Between {}", self.range(quota))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_literal() {
        let state = FilterState::default();
        assert_eq!(state.range(Quota::Oc), CutoffRange::new(190.0, 200.0));
        assert_eq!(state.range(Quota::Bc), CutoffRange::new(185.0, 200.0));
        for q in &Quota::ALL[2..] {
            assert_eq!(state.range(*q), CutoffRange::INACTIVE, "{q}");
        }
        assert!(state.college_name.is_empty());
        assert!(state.college_code.is_empty());
        assert!(state.branch_codes.is_empty());
        assert_eq!(state.active_filter_count(), 2);
    }

    #[test]
    fn test_set_touches_one_field() {
        let mut state = FilterState::default();
        state.set(FilterUpdate::Range(Quota::Sc, CutoffRange::new(200.0, 150.0)));
        assert_eq!(state.range(Quota::Sc), CutoffRange::new(200.0, 150.0));
        assert_eq!(state.range(Quota::Oc), CutoffRange::new(190.0, 200.0));

        state.set(FilterUpdate::CollegeName("abc".to_string()));
        assert_eq!(state.college_name, "abc");
        assert!(state.college_code.is_empty());
        assert_eq!(state.active_filter_count(), 4);
    }

    #[test]
    fn test_unfiltered_is_empty() {
        assert!(FilterState::unfiltered().is_empty());
        assert!(!FilterState::default().is_empty());
        assert!(!FilterState::unfiltered().is_default());
    }

    #[test]
    fn test_describe_range() {
        let state = FilterState::default();
        assert_eq!(state.describe_range(Quota::Oc), "OC - Between 190 - 200");
        assert_eq!(state.describe_range(Quota::St), "ST - Between 0 - 0");
    }
}
