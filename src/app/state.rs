// CutoffScout - app/state.rs
//
// Session state. Holds the immutable dataset and branch catalog, the
// current filter state, and the query engine's view of it. Every
// mutation recomputes the view before returning.

use crate::core::catalog::BranchCatalog;
use crate::core::filter::{FilterState, FilterUpdate};
use crate::core::model::{Quota, Record};
use crate::core::predicate::DiagnosticSink;
use crate::core::query::{FilterRun, QueryEngine};
use crate::core::reset::{self, ResetAction};

/// Top-level session state.
pub struct AppState {
    /// All records, in source order. Never mutated after load.
    records: Vec<Record>,

    /// Branch choices for the multi-select filter.
    pub catalog: BranchCatalog,

    /// Current filter configuration.
    filter_state: FilterState,

    /// Current filtered view.
    engine: QueryEngine,

    /// Where per-record evaluation failures go.
    sink: Box<dyn DiagnosticSink>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("records", &self.records.len())
            .field("catalog", &self.catalog.len())
            .field("filter_state", &self.filter_state)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create a session with the default filter state applied.
    pub fn new(records: Vec<Record>, catalog: BranchCatalog, sink: Box<dyn DiagnosticSink>) -> Self {
        let engine = QueryEngine::new(records.len());
        let mut state = Self {
            records,
            catalog,
            filter_state: FilterState::default(),
            engine,
            sink,
        };
        state.apply_filters();
        state
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter_state
    }

    /// Store one field and recompute.
    pub fn set(&mut self, update: FilterUpdate) -> &FilterRun {
        self.filter_state.set(update);
        self.apply_filters()
    }

    /// Store several fields, then recompute once.
    pub fn set_many<I: IntoIterator<Item = FilterUpdate>>(&mut self, updates: I) -> &FilterRun {
        for update in updates {
            self.filter_state.set(update);
        }
        self.apply_filters()
    }

    /// Apply a reset and recompute.
    pub fn reset(&mut self, action: ResetAction) -> &FilterRun {
        reset::apply(&mut self.filter_state, action);
        self.apply_filters()
    }

    pub fn reset_all(&mut self) -> &FilterRun {
        self.reset(ResetAction::All)
    }

    pub fn reset_range(&mut self, quota: Quota) -> &FilterRun {
        self.reset(ResetAction::Range(quota))
    }

    /// Recompute the filtered view from the current filter state.
    pub fn apply_filters(&mut self) -> &FilterRun {
        self.engine
            .run(&self.records, &self.filter_state, self.sink.as_mut())
    }

    /// Records in the current view, in source order.
    pub fn filtered_records(&self) -> Vec<&Record> {
        self.engine.records(&self.records).collect()
    }

    pub fn last_run(&self) -> &FilterRun {
        self.engine.last_run()
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }
}
