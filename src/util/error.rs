// CutoffScout - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all CutoffScout operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ScoutError {
    /// Dataset or lookup loading failed.
    Load(LoadError),

    /// Filter state is unusable.
    Filter(FilterError),

    /// Writing the filtered view failed.
    Export(ExportError),

    /// A console command could not be understood.
    Command(CommandError),

    /// I/O error outside of any specific subsystem.
    Io {
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for ScoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Output error: {e}"),
            Self::Command(e) => write!(f, "Command error: {e}"),
            Self::Io { operation, source } => write!(f, "I/O error during {operation}: {source}"),
        }
    }
}

impl std::error::Error for ScoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Command(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors related to reading the dataset and branch lookup files.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io { path: PathBuf, source: io::Error },

    /// The file is not valid JSON of the expected shape.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// The file holds no data at all (zero bytes or only whitespace).
    Empty { path: PathBuf },

    /// The dataset holds more records than the engine accepts.
    TooManyRecords { path: PathBuf, count: usize, max: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "Invalid JSON in '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Empty { path } => write!(f, "'{}' is empty", path.display()),
            Self::TooManyRecords { path, count, max } => write!(
                f,
                "'{}' holds {count} records, maximum is {max}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LoadError> for ScoutError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Predicate errors (per record, never fatal)
// ---------------------------------------------------------------------------

/// A single record could not be evaluated against one filter.
///
/// These never abort a filter run: the record is kept and the error is
/// handed to the run's diagnostic sink.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateError {
    /// A text field is null, or holds a value with no string form (array, object, bool).
    NotText { field: &'static str, found: String },

    /// A cutoff field holds a value that is not a number.
    NotNumeric { field: &'static str, found: String },
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotText { field, found } => {
                write!(f, "field '{field}' is not text-like: {found}")
            }
            Self::NotNumeric { field, found } => {
                write!(f, "cutoff '{field}' is not numeric: {found}")
            }
        }
    }
}

impl std::error::Error for PredicateError {}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter state.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A quota name did not match any of the nine community quotas.
    UnknownQuota { name: String },

    /// An active range carries a bound that cannot be compared.
    InvalidRange {
        quota: &'static str,
        low: f64,
        high: f64,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownQuota { name } => write!(
                f,
                "Unknown quota '{name}'. Expected one of OC, BC, BCM, MBC, MBCDNC, MBCV, SC, SCA, ST"
            ),
            Self::InvalidRange { quota, low, high } => {
                write!(f, "Range for {quota} has a non-finite bound ({low}, {high})")
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for ScoutError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing a filtered view.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the output.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "write failed: {source}"),
            Self::Csv { source } => write!(f, "CSV output failed: {source}"),
            Self::Json { source } => write!(f, "JSON output failed: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for ScoutError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Errors produced while parsing console commands and CLI filter arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The command word is not recognised.
    Unknown { command: String },

    /// A required argument is missing.
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    /// A numeric argument could not be parsed.
    InvalidNumber { value: String },

    /// A range argument is not of the form `QUOTA=LOW:HIGH`.
    MalformedRange { value: String },

    /// The argument named a quota that does not exist.
    Filter(FilterError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { command } => {
                write!(f, "Unknown command '{command}'. Type 'help' for a list.")
            }
            Self::MissingArgument { command, argument } => {
                write!(f, "'{command}' needs a <{argument}> argument")
            }
            Self::InvalidNumber { value } => write!(f, "'{value}' is not a number"),
            Self::MalformedRange { value } => {
                write!(f, "'{value}' is not a range; expected QUOTA=LOW:HIGH")
            }
            Self::Filter(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FilterError> for CommandError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

impl From<CommandError> for ScoutError {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

/// Convenience type alias for CutoffScout results.
pub type Result<T> = std::result::Result<T, ScoutError>;
