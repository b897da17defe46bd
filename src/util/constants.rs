// CutoffScout - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "CutoffScout";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "CutoffScout";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Cutoff domain
// =============================================================================

/// Default OC range applied at session start.
pub const DEFAULT_OC_RANGE: (f64, f64) = (190.0, 200.0);

/// Default BC range applied at session start.
pub const DEFAULT_BC_RANGE: (f64, f64) = (185.0, 200.0);

// =============================================================================
// Input limits
// =============================================================================

/// Maximum size of the dataset JSON file in bytes.
pub const MAX_DATASET_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

/// Maximum size of the branch lookup JSON file in bytes.
pub const MAX_LOOKUP_FILE_SIZE: u64 = 1024 * 1024; // 1 MB

/// Hard upper bound on the number of records held in memory.
///
/// The engine is a linear scan per update; beyond this the interactive
/// console stops feeling instantaneous.
pub const MAX_RECORDS: usize = 500_000;

/// Maximum number of per-record diagnostics retained by a collecting sink.
/// Further failures are counted but not stored.
pub const MAX_RETAINED_DIAGNOSTICS: usize = 1_000;

// =============================================================================
// Console / coalescing
// =============================================================================

/// Default coalescing window for range updates (ms).
pub const DEFAULT_COALESCE_WINDOW_MS: u64 = 10;

/// Minimum user-configurable coalescing window (ms). Zero disables coalescing.
pub const MIN_COALESCE_WINDOW_MS: u64 = 0;

/// Maximum user-configurable coalescing window (ms).
pub const MAX_COALESCE_WINDOW_MS: u64 = 2_000;

/// How often the console loop wakes to flush due coalesced values (ms).
pub const CONSOLE_TICK_MS: u64 = 5;

/// Console prompt.
pub const CONSOLE_PROMPT: &str = "scout> ";

// =============================================================================
// Output
// =============================================================================

/// Default number of rows printed by the table renderer.
pub const DEFAULT_MAX_ROWS: usize = 50;

/// Maximum user-configurable row limit for the table renderer.
pub const ABSOLUTE_MAX_ROWS: usize = 100_000;

/// Column width cap for text columns in the table renderer.
pub const TABLE_TEXT_COLUMN_WIDTH: usize = 40;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
