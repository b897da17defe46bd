// CutoffScout - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Dataset and branch lookup loading
// 4. One-shot filtering to stdout, or the interactive console

use clap::Parser;
use cutoffscout::app::console::{self, Console};
use cutoffscout::app::loader;
use cutoffscout::app::state::AppState;
use cutoffscout::core::catalog::BranchCatalog;
use cutoffscout::core::export::{self, OutputFormat};
use cutoffscout::core::filter::FilterUpdate;
use cutoffscout::core::model::Quota;
use cutoffscout::core::predicate::TracingSink;
use cutoffscout::platform::config::{self, AppConfig, PlatformPaths};
use cutoffscout::util::constants;
use cutoffscout::util::error::{CommandError, Result, ScoutError};
use std::io::Write;
use std::path::PathBuf;

/// CutoffScout - filter college admission cutoff tables.
///
/// Loads a JSON dataset of college/branch cutoffs and narrows it by college
/// name, college code, branch code and per-quota cutoff ranges. Starts from
/// the default view: OC 190-200 and BC 185-200.
#[derive(Parser, Debug)]
#[command(name = "CutoffScout", version, about)]
struct Cli {
    /// Dataset JSON file (array of cutoff records).
    #[arg(long = "data")]
    data: PathBuf,

    /// Branch-code lookup JSON file (array of {value, label}).
    #[arg(short = 'b', long = "branches")]
    branches: Option<PathBuf>,

    /// College name contains this text (case-insensitive).
    #[arg(short = 'n', long = "college-name")]
    college_name: Option<String>,

    /// College code contains this text (case-insensitive).
    #[arg(short = 'c', long = "college-code")]
    college_code: Option<String>,

    /// Only these branch codes. Repeatable; commas also separate codes.
    #[arg(long = "branch")]
    branch: Vec<String>,

    /// Cutoff range as QUOTA=LOW:HIGH, e.g. SC=150:180. Repeatable.
    #[arg(short = 'r', long = "range")]
    range: Vec<String>,

    /// Switch off one quota's range filter (e.g. OC). Repeatable.
    #[arg(long = "reset-range")]
    reset_range: Vec<String>,

    /// Output format: table, csv or json.
    #[arg(short = 'f', long = "format", value_parser = ["table", "csv", "json"])]
    format: Option<String>,

    /// Maximum rows printed in table format.
    #[arg(short = 'l', long = "limit")]
    limit: Option<usize>,

    /// List branch codes (optionally only those whose label matches) and exit.
    #[arg(long = "list-branches", num_args = 0..=1, default_missing_value = "")]
    list_branches: Option<String>,

    /// Start an interactive filtering console on stdin/stdout.
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    cutoffscout::util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "CutoffScout starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    if let Err(e) = run(&cli, &app_config) {
        tracing::error!(error = %e, "CutoffScout failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &AppConfig) -> Result<()> {
    let records = loader::load_dataset(&cli.data)?;
    let catalog = match cli.branches {
        Some(ref path) => loader::load_branch_catalog(path)?,
        None => BranchCatalog::default(),
    };

    if let Some(ref search) = cli.list_branches {
        return list_branches(&catalog, search);
    }

    let mut state = AppState::new(records, catalog, Box::new(TracingSink));
    state.set_many(initial_updates(cli)?);
    for name in &cli.reset_range {
        let quota: Quota = name.parse()?;
        state.reset_range(quota);
    }

    if cli.interactive {
        let stdin = std::io::BufReader::new(std::io::stdin());
        let mut console = Console::new(
            state,
            app_config.coalesce_window,
            app_config.max_rows,
            std::io::stdout(),
        );
        return console::run_console(&mut console, stdin).map_err(|e| ScoutError::Io {
            operation: "console session",
            source: e,
        });
    }

    print_view(cli, app_config, &state)
}

/// Filter updates requested on the command line, applied over the default state.
fn initial_updates(cli: &Cli) -> std::result::Result<Vec<FilterUpdate>, CommandError> {
    let mut updates = Vec::new();
    if let Some(ref name) = cli.college_name {
        updates.push(FilterUpdate::CollegeName(name.clone()));
    }
    if let Some(ref code) = cli.college_code {
        updates.push(FilterUpdate::CollegeCode(code.clone()));
    }
    if !cli.branch.is_empty() {
        let codes = console::parse_codes(&cli.branch.join(","));
        updates.push(FilterUpdate::BranchCodes(codes));
    }
    for spec in &cli.range {
        let (quota, range) = console::parse_range_spec(spec)?;
        updates.push(FilterUpdate::Range(quota, range));
    }
    Ok(updates)
}

fn list_branches(catalog: &BranchCatalog, search: &str) -> Result<()> {
    let mut out = std::io::stdout().lock();
    let io = |e| ScoutError::Io {
        operation: "listing branches",
        source: e,
    };
    for opt in catalog.search(search) {
        writeln!(out, "{:<8} {}", opt.value, opt.label).map_err(io)?;
    }
    Ok(())
}

fn print_view(cli: &Cli, app_config: &AppConfig, state: &AppState) -> Result<()> {
    let format = cli
        .format
        .as_deref()
        .and_then(OutputFormat::from_name)
        .unwrap_or(app_config.format);

    let run = state.last_run();
    if run.stale {
        tracing::warn!("Filtered view is stale; showing the last good result");
    }
    eprintln!(
        "{}",
        console::run_summary(run, state.filter_state().active_filter_count())
    );

    let rows = state.filtered_records();
    let out = std::io::stdout().lock();
    let written = match format {
        OutputFormat::Table => {
            export::render_table(&rows, cli.limit.unwrap_or(app_config.max_rows), out)?
        }
        OutputFormat::Csv => export::export_csv(&rows, out)?,
        OutputFormat::Json => export::export_json(&rows, out)?,
    };
    tracing::debug!(rows = written, ?format, "Wrote filtered view");
    Ok(())
}
