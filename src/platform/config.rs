// CutoffScout - platform/config.rs
//
// Platform-specific configuration directory resolution and read-only
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance. Filter state is never read from or written
// to this file; it only tunes the front end.

use crate::core::export::OutputFormat;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for CutoffScout configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/cutoffscout/ or %APPDATA%\CutoffScout\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[console]` section.
    pub console: ConsoleSection,
    /// `[output]` section.
    pub output: OutputSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[console]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ConsoleSection {
    /// Range-update coalescing window in ms (0 = apply every update).
    pub coalesce_window_ms: Option<u64>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// "table", "csv" or "json".
    pub format: Option<String>,
    /// Rows printed by the table renderer.
    pub max_rows: Option<usize>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Range-update coalescing window.
    pub coalesce_window: Duration,
    /// Default output format.
    pub format: OutputFormat,
    /// Rows printed by the table renderer.
    pub max_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            coalesce_window: Duration::from_millis(constants::DEFAULT_COALESCE_WINDOW_MS),
            format: OutputFormat::Table,
            max_rows: constants::DEFAULT_MAX_ROWS,
        }
    }
}

/// Read and parse a config file without validating values.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate the config file at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults with one warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw_config(config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Console: coalesce_window_ms --
    if let Some(ms) = raw.console.coalesce_window_ms {
        if (constants::MIN_COALESCE_WINDOW_MS..=constants::MAX_COALESCE_WINDOW_MS).contains(&ms) {
            config.coalesce_window = Duration::from_millis(ms);
        } else {
            warnings.push(format!(
                "[console] coalesce_window_ms = {ms} is out of range ({}-{}). Using default ({}).",
                constants::MIN_COALESCE_WINDOW_MS,
                constants::MAX_COALESCE_WINDOW_MS,
                constants::DEFAULT_COALESCE_WINDOW_MS,
            ));
        }
    }

    // -- Output: format --
    if let Some(ref name) = raw.output.format {
        match OutputFormat::from_name(name) {
            Some(format) => config.format = format,
            None => warnings.push(format!(
                "[output] format = \"{name}\" is not recognised. \
                 Expected \"table\", \"csv\" or \"json\". Using default (table).",
            )),
        }
    }

    // -- Output: max_rows --
    if let Some(rows) = raw.output.max_rows {
        if (1..=constants::ABSOLUTE_MAX_ROWS).contains(&rows) {
            config.max_rows = rows;
        } else {
            warnings.push(format!(
                "[output] max_rows = {rows} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_ROWS,
                constants::DEFAULT_MAX_ROWS,
            ));
        }
    }

    config
}
