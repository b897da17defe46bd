// CutoffScout - core/reset.rs
//
// Reset policy: the only two ways filter state goes back to a known value.

use crate::core::filter::{FilterState, FilterUpdate};
use crate::core::model::{CutoffRange, Quota};

/// What to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetAction {
    /// Replace the whole state with the literal default.
    All,
    /// Switch off one range filter; everything else is kept.
    Range(Quota),
}

/// Apply a reset to `state` in place.
pub fn apply(state: &mut FilterState, action: ResetAction) {
    match action {
        ResetAction::All => *state = FilterState::default(),
        ResetAction::Range(quota) => {
            state.set(FilterUpdate::Range(quota, CutoffRange::INACTIVE));
        }
    }
    tracing::debug!(?action, "Filter state reset");
}
