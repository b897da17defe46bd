// CutoffScout - app/mod.rs
//
// Application layer: input loading, session state, and the console front end.
// Dependencies: core, platform.

pub mod coalesce;
pub mod console;
pub mod loader;
pub mod state;
