// CutoffScout - lib.rs
//
// Library entry point, exposing all modules for integration testing
// and embedding the filter engine in other front ends.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
