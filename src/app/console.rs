// CutoffScout - app/console.rs
//
// Interactive line console: the UI collaborator for terminal sessions.
//
// Architecture:
//   - A background thread reads input lines and sends them over an mpsc
//     channel, so the main loop can wake on a short tick even while the
//     user is idle.
//   - Range commands go through a per-quota Coalescer; only the settled
//     value of a burst reaches the engine.
//   - Any other command first flushes pending ranges so commands take
//     effect in the order they were typed.

use crate::app::coalesce::Coalescer;
use crate::app::state::AppState;
use crate::core::export;
use crate::core::filter::FilterUpdate;
use crate::core::model::{CutoffRange, Quota};
use crate::core::query::FilterRun;
use crate::core::reset::ResetAction;
use crate::util::constants;
use crate::util::error::CommandError;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

// =============================================================================
// Commands
// =============================================================================

/// One parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CollegeName(String),
    CollegeCode(String),
    Branches(BTreeSet<String>),
    Range(Quota, CutoffRange),
    Reset(ResetAction),
    SearchBranches(String),
    State,
    Show(Option<usize>),
    Help,
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  name <text>               college name contains <text> (empty clears)
  code <text>               college code contains <text> (empty clears)
  branch <code> [code...]   only these branch codes (no codes clears)
  range <QUOTA> <low> <high> cutoff range; 0 0 switches it off
  reset [QUOTA]             reset everything, or one range
  branches [search]         list branch codes whose label matches
  state                     show the current filters
  show [n]                  print the first n matching rows
  help                      this text
  quit                      leave";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "name" => Command::CollegeName(rest.to_string()),
        "code" => Command::CollegeCode(rest.to_string()),
        "branch" => Command::Branches(parse_codes(rest)),
        "range" => {
            let mut parts = rest.split_whitespace();
            let quota: Quota = parts
                .next()
                .ok_or(CommandError::MissingArgument {
                    command: "range",
                    argument: "quota",
                })?
                .parse()?;
            let low = parse_number(parts.next(), "low")?;
            let high = parse_number(parts.next(), "high")?;
            Command::Range(quota, CutoffRange::new(low, high))
        }
        "reset" => {
            if rest.is_empty() {
                Command::Reset(ResetAction::All)
            } else {
                Command::Reset(ResetAction::Range(rest.parse()?))
            }
        }
        "branches" => Command::SearchBranches(rest.to_string()),
        "state" => Command::State,
        "show" => {
            if rest.is_empty() {
                Command::Show(None)
            } else {
                let n = rest.parse::<usize>().map_err(|_| CommandError::InvalidNumber {
                    value: rest.to_string(),
                })?;
                Command::Show(Some(n))
            }
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(CommandError::Unknown {
                command: other.to_string(),
            })
        }
    };
    Ok(Some(command))
}

fn parse_number(arg: Option<&str>, argument: &'static str) -> Result<f64, CommandError> {
    let raw = arg.ok_or(CommandError::MissingArgument {
        command: "range",
        argument,
    })?;
    raw.parse::<f64>().map_err(|_| CommandError::InvalidNumber {
        value: raw.to_string(),
    })
}

/// Split a list of branch codes on whitespace and commas.
pub fn parse_codes(text: &str) -> BTreeSet<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `QUOTA=LOW:HIGH` range argument (as used on the command line).
pub fn parse_range_spec(spec: &str) -> Result<(Quota, CutoffRange), CommandError> {
    let malformed = || CommandError::MalformedRange {
        value: spec.to_string(),
    };
    let (name, bounds) = spec.split_once('=').ok_or_else(malformed)?;
    let (low, high) = bounds.split_once(':').ok_or_else(malformed)?;
    let quota: Quota = name.parse()?;
    let low = parse_number(Some(low.trim()), "low")?;
    let high = parse_number(Some(high.trim()), "high")?;
    Ok((quota, CutoffRange::new(low, high)))
}

// =============================================================================
// Rendering helpers
// =============================================================================

/// One-line summary of a run.
pub fn run_summary(run: &FilterRun, active_filters: usize) -> String {
    let mut line = format!(
        "{} of {} records match ({} filter{} active)",
        run.matched,
        run.total,
        active_filters,
        if active_filters == 1 { "" } else { "s" }
    );
    if run.defaulted > 0 {
        line.push_str(&format!(
            "; {} kept because they could not be evaluated",
            run.defaulted
        ));
    }
    if run.stale {
        line.push_str("; view is STALE, last filter change could not be applied");
    }
    line
}

/// Human-readable listing of the current filters.
pub fn describe_state(state: &AppState) -> Vec<String> {
    let filters = state.filter_state();
    let mut lines = Vec::new();
    lines.push(format!("College name contains: \"{}\"", filters.college_name));
    lines.push(format!("College code contains: \"{}\"", filters.college_code));
    if filters.branch_codes.is_empty() {
        lines.push("Branch codes: (all)".to_string());
    } else {
        let codes: Vec<&str> = filters.branch_codes.iter().map(String::as_str).collect();
        lines.push(format!("Branch codes: {}", codes.join(", ")));
    }
    for (quota, range) in filters.ranges() {
        let suffix = if range.is_inactive() { " (off)" } else { "" };
        lines.push(format!("{}{suffix}", filters.describe_range(quota)));
    }
    lines
}

// =============================================================================
// Console driver
// =============================================================================

/// What the loop should do after handling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Console session: applies commands to an `AppState`, writing feedback to `out`.
pub struct Console<W: Write> {
    state: AppState,
    ranges: Coalescer<Quota, CutoffRange>,
    out: W,
    max_rows: usize,
}

impl<W: Write> Console<W> {
    pub fn new(state: AppState, coalesce_window: Duration, max_rows: usize, out: W) -> Self {
        Self {
            state,
            ranges: Coalescer::new(coalesce_window),
            out,
            max_rows,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Consume the console, returning its state and writer.
    pub fn into_parts(self) -> (AppState, W) {
        (self.state, self.out)
    }

    /// Handle one parsed command at time `now`.
    pub fn handle(&mut self, command: Command, now: Instant) -> std::io::Result<Flow> {
        if let Command::Range(quota, range) = command {
            self.ranges.offer(quota, range, now);
            return self.tick(now).map(|_| Flow::Continue);
        }

        self.flush_ranges()?;

        match command {
            Command::CollegeName(text) => self.apply(FilterUpdate::CollegeName(text))?,
            Command::CollegeCode(text) => self.apply(FilterUpdate::CollegeCode(text))?,
            Command::Branches(codes) => {
                let unknown: Vec<String> = self
                    .state
                    .catalog
                    .unknown_codes(&codes)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                if !unknown.is_empty() && !self.state.catalog.is_empty() {
                    writeln!(self.out, "note: not in branch list: {}", unknown.join(", "))?;
                }
                self.apply(FilterUpdate::BranchCodes(codes))?;
            }
            Command::Reset(action) => {
                self.state.reset(action);
                self.report()?;
            }
            Command::SearchBranches(search) => {
                for opt in self.state.catalog.search(&search) {
                    writeln!(self.out, "{:<8} {}", opt.value, opt.label)?;
                }
            }
            Command::State => {
                for line in describe_state(&self.state) {
                    writeln!(self.out, "{line}")?;
                }
                self.report()?;
            }
            Command::Show(n) => {
                let rows = self.state.filtered_records();
                let limit = n.unwrap_or(self.max_rows);
                export::render_table(&rows, limit, &mut self.out)
                    .map_err(std::io::Error::other)?;
            }
            Command::Help => writeln!(self.out, "{HELP_TEXT}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Range(..) => {}
        }
        Ok(Flow::Continue)
    }

    /// Apply coalesced range values whose window has closed.
    pub fn tick(&mut self, now: Instant) -> std::io::Result<()> {
        let due = self.ranges.take_due(now);
        self.apply_ranges(due)
    }

    /// Apply every pending range value immediately.
    pub fn flush_ranges(&mut self) -> std::io::Result<()> {
        let pending = self.ranges.flush();
        self.apply_ranges(pending)
    }

    /// When the next coalesced value becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ranges.next_deadline()
    }

    fn apply_ranges(&mut self, ranges: Vec<(Quota, CutoffRange)>) -> std::io::Result<()> {
        if ranges.is_empty() {
            return Ok(());
        }
        self.state.set_many(
            ranges
                .into_iter()
                .map(|(quota, range)| FilterUpdate::Range(quota, range)),
        );
        self.report()
    }

    fn apply(&mut self, update: FilterUpdate) -> std::io::Result<()> {
        self.state.set(update);
        self.report()
    }

    fn report(&mut self) -> std::io::Result<()> {
        let active = self.state.filter_state().active_filter_count();
        let line = run_summary(self.state.last_run(), active);
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        write!(self.out, "{}", constants::CONSOLE_PROMPT)?;
        self.out.flush()
    }
}

/// Drive a console from `input` until it ends or the user quits.
///
/// Lines are read on a background thread; the loop wakes every
/// `CONSOLE_TICK_MS` to release coalesced range values.
pub fn run_console<R, W>(console: &mut Console<W>, input: R) -> std::io::Result<()>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let (tx, rx) = mpsc::channel::<std::io::Result<String>>();
    std::thread::spawn(move || {
        for line in input.lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    writeln!(console.out, "{HELP_TEXT}")?;
    console.report()?;
    console.prompt()?;

    let tick = Duration::from_millis(constants::CONSOLE_TICK_MS);
    loop {
        match rx.recv_timeout(tick) {
            Ok(Ok(line)) => {
                let flow = match parse_command(&line) {
                    Ok(Some(command)) => console.handle(command, Instant::now())?,
                    Ok(None) => Flow::Continue,
                    Err(e) => {
                        tracing::debug!(error = %e, "Rejected console input");
                        writeln!(console.out, "error: {e}")?;
                        Flow::Continue
                    }
                };
                if flow == Flow::Quit {
                    break;
                }
                console.prompt()?;
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Console input failed");
                break;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => console.tick(Instant::now())?,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    console.flush_ranges()?;
    tracing::debug!("Console session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::BranchCatalog;
    use crate::core::model::{BranchOption, Record};
    use crate::core::predicate::NullSink;

    fn make_record(code: &str, branch: &str, oc: f64, bc: f64) -> Record {
        Record {
            college_code: code.into(),
            college_name: format!("College {code}").as_str().into(),
            branch_code: branch.into(),
            branch_name: "Branch".into(),
            oc: oc.into(),
            bc: bc.into(),
            ..Default::default()
        }
    }

    fn console() -> Console<Vec<u8>> {
        let records = vec![
            make_record("1", "CS", 195.0, 190.0),
            make_record("2", "ME", 170.0, 160.0),
            make_record("3", "CS", 199.0, 186.0),
        ];
        let catalog = BranchCatalog::new(vec![BranchOption {
            value: "CS".to_string(),
            label: "CS - Computer Science".to_string(),
        }]);
        let state = AppState::new(records, catalog, Box::new(NullSink));
        Console::new(state, Duration::from_millis(10), 10, Vec::new())
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_parts().1).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("range oc 200 190").unwrap(),
            Some(Command::Range(Quota::Oc, CutoffRange::new(200.0, 190.0)))
        );
        assert_eq!(
            parse_command("reset BC").unwrap(),
            Some(Command::Reset(ResetAction::Range(Quota::Bc)))
        );
        assert_eq!(parse_command("reset").unwrap(), Some(Command::Reset(ResetAction::All)));
        assert_eq!(
            parse_command("name  abc college ").unwrap(),
            Some(Command::CollegeName("abc college".to_string()))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("show 5").unwrap(), Some(Command::Show(Some(5))));
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(matches!(
            parse_command("frobnicate"),
            Err(CommandError::Unknown { .. })
        ));
        assert!(matches!(
            parse_command("range OC 190"),
            Err(CommandError::MissingArgument { argument: "high", .. })
        ));
        assert!(matches!(
            parse_command("range XX 1 2"),
            Err(CommandError::Filter(_))
        ));
        assert!(matches!(
            parse_command("range OC abc 2"),
            Err(CommandError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_parse_codes_and_range_spec() {
        let codes = parse_codes("CS, ME  EE");
        assert_eq!(codes.len(), 3);
        assert!(codes.contains("EE"));
        assert_eq!(
            parse_range_spec("SC=120:150").unwrap(),
            (Quota::Sc, CutoffRange::new(120.0, 150.0))
        );
        assert!(matches!(
            parse_range_spec("SC120:150"),
            Err(CommandError::MalformedRange { .. })
        ));
    }

    #[test]
    fn test_range_commands_are_coalesced() {
        let mut c = console();
        let t0 = Instant::now();
        c.handle(Command::Range(Quota::Bc, CutoffRange::new(150.0, 200.0)), t0)
            .unwrap();
        c.handle(
            Command::Range(Quota::Bc, CutoffRange::new(189.0, 200.0)),
            t0 + Duration::from_millis(4),
        )
        .unwrap();
        // Nothing applied yet.
        assert_eq!(
            c.state().filter_state().range(Quota::Bc),
            CutoffRange::new(185.0, 200.0)
        );

        c.tick(t0 + Duration::from_millis(10)).unwrap();
        assert_eq!(
            c.state().filter_state().range(Quota::Bc),
            CutoffRange::new(189.0, 200.0)
        );
        assert_eq!(c.state().engine().view(), &[0]);
    }

    #[test]
    fn test_other_commands_flush_pending_ranges_first() {
        let mut c = console();
        let t0 = Instant::now();
        c.handle(Command::Range(Quota::Oc, CutoffRange::INACTIVE), t0)
            .unwrap();
        c.handle(Command::Reset(ResetAction::Range(Quota::Bc)), t0)
            .unwrap();
        assert_eq!(c.state().last_run().matched, 3);
    }

    #[test]
    fn test_state_and_branches_output() {
        let mut c = console();
        let now = Instant::now();
        c.handle(Command::Branches(parse_codes("CS XX")), now).unwrap();
        c.handle(Command::SearchBranches("computer".to_string()), now)
            .unwrap();
        c.handle(Command::State, now).unwrap();
        let out = output(c);
        assert!(out.contains("note: not in branch list: XX"));
        assert!(out.contains("CS       CS - Computer Science"));
        assert!(out.contains("Branch codes: CS, XX"));
        assert!(out.contains("OC - Between 190 - 200"));
        assert!(out.contains("MBC - Between 0 - 0 (off)"));
    }

    #[test]
    fn test_quit() {
        let mut c = console();
        assert_eq!(c.handle(Command::Quit, Instant::now()).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_run_console_reads_until_quit() {
        let mut c = console();
        let input = std::io::Cursor::new(b"reset\nname college 3\nshow\nquit\nname never\n".to_vec());
        run_console(&mut c, input).unwrap();
        assert_eq!(c.state().filter_state().college_name, "college 3");
        let out = output(c);
        assert!(out.contains("1 of 3 records match"));
        assert!(out.contains("1-1 of 1 items"));
    }

    #[test]
    fn test_run_summary_flags() {
        let run = FilterRun {
            total: 10,
            matched: 4,
            defaulted: 1,
            stale: true,
        };
        let line = run_summary(&run, 1);
        assert!(line.starts_with("4 of 10 records match (1 filter active)"));
        assert!(line.contains("1 kept"));
        assert!(line.contains("STALE"));
    }
}
