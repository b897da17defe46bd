// CutoffScout - core/mod.rs
//
// Core business logic layer: the filtering engine and its data model.
// Must NOT depend on: app, platform, or any I/O beyond io::Write.

pub mod catalog;
pub mod export;
pub mod filter;
pub mod model;
pub mod predicate;
pub mod query;
pub mod reset;
