// agingboard - account aging reports from spreadsheet exports

mod exit_codes;
mod session;
mod table;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use agingboard_aging::cache::TtlCache;
use agingboard_aging::{AgingError, DatasetSession, FixedClock, View};
use agingboard_config::settings::LogSettings;
use agingboard_config::{Settings, SettingsError};
use agingboard_io::{IoError, UploadPolicy};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use exit_codes::{aging_exit_code, io_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "agingboard")]
#[command(about = "Account aging by business area, from Excel or CSV exports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/agingboard/settings.toml)
    #[arg(long, global = true, env = "AGINGBOARD_SETTINGS")]
    settings: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count accounts per business area and age bucket
    #[command(after_help = "\
Views:
  disconnected   age since the disconnection date
  revisit        rows with a revisit date, aged by disconnection date
  belumrevisit   disconnected minus revisit, per area and bucket

Examples:
  agingboard aggregate accounts.xlsx --view disconnected
  agingboard aggregate accounts.xlsx --view belumrevisit --json
  agingboard aggregate accounts.csv --view revisit --as-of 2025-01-01 --output revisit.json")]
    Aggregate {
        /// Spreadsheet to read (first sheet, header row first)
        file: PathBuf,

        /// disconnected, revisit or belumrevisit
        #[arg(long)]
        view: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also write the JSON aggregate to this file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Count days up to midnight of this date (YYYY-MM-DD) instead of now
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,
    },

    /// List every counted row with its age and bucket
    Records {
        /// Spreadsheet to read (first sheet, header row first)
        file: PathBuf,

        /// disconnected or revisit
        #[arg(long)]
        view: String,

        /// Print JSON instead of tab-separated lines
        #[arg(long)]
        json: bool,

        /// Count days up to midnight of this date (YYYY-MM-DD) instead of now
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,
    },

    /// Full JSON report for one view: records, bucket totals, per-area counts
    Report {
        /// Spreadsheet to read (first sheet, header row first)
        file: PathBuf,

        #[arg(long, default_value = "disconnected")]
        view: String,

        /// Write the report here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Count days up to midnight of this date (YYYY-MM-DD) instead of now
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,
    },

    /// Keep a dataset loaded and answer commands read from stdin
    #[command(after_help = "\
Commands (one per line, one JSON response per line):
  load <PATH>        replace the current dataset
  aggregate <VIEW>   per-area counts
  records <VIEW>     classified rows
  report <VIEW>      full report
  status             current dataset, or null
  clear              drop the current dataset
  quit               exit (so does end of input)")]
    Session {
        /// Count days up to midnight of this date (YYYY-MM-DD) instead of now
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,
    },
}

impl Commands {
    /// Whether failures should be reported as a JSON envelope.
    fn json_errors(&self) -> bool {
        match self {
            Commands::Aggregate { json, .. } | Commands::Records { json, .. } => *json,
            Commands::Report { .. } | Commands::Session { .. } => true,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  agingboard-aging ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  agingboard-aging ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn parse_as_of(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("expected YYYY-MM-DD, got '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_errors = cli.command.json_errors();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            err.report(json_errors);
            ExitCode::from(err.code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(cli.settings.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Aggregate { file, view, json, output, as_of } => {
            cmd_aggregate(&settings, &file, &view, json, output.as_deref(), as_of)
        }
        Commands::Records { file, view, json, as_of } => {
            cmd_records(&settings, &file, &view, json, as_of)
        }
        Commands::Report { file, view, output, as_of } => {
            cmd_report(&settings, &file, &view, output.as_deref(), as_of)
        }
        Commands::Session { as_of } => cmd_session(&settings, as_of),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    /// Machine-readable error code for the JSON envelope
    pub kind: &'static str,
    pub message: String,
    pub hint: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl CliError {
    pub fn usage(kind: &'static str, msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, kind, message: msg.into(), hint: None, metadata: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, kind: "IO_ERROR", message: msg.into(), hint: None, metadata: None }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, kind: "INTERNAL_ERROR", message: msg.into(), hint: None, metadata: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// `{"error": {"code", "message", "metadata"?}}`
    pub fn to_json(&self) -> serde_json::Value {
        let mut error = serde_json::Map::new();
        error.insert("code".into(), self.kind.into());
        error.insert("message".into(), self.message.clone().into());
        if let Some(metadata) = &self.metadata {
            error.insert("metadata".into(), metadata.clone());
        }
        serde_json::json!({ "error": error })
    }

    fn report(&self, json: bool) {
        if json {
            eprintln!("{}", self.to_json());
            return;
        }
        if !self.message.is_empty() {
            eprintln!("error: {}", self.message);
        }
        if let Some(hint) = &self.hint {
            eprintln!("hint:  {}", hint);
        }
    }
}

impl From<AgingError> for CliError {
    fn from(err: AgingError) -> Self {
        let hint = match &err {
            AgingError::InvalidView(_) => Some(format!(
                "expected one of: {}",
                View::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
            )),
            AgingError::AggregateOnlyView(_) => Some("use `aggregate` for this view".to_string()),
            AgingError::NoDatasetLoaded => Some("load a file first".to_string()),
            _ => None,
        };
        Self {
            code: aging_exit_code(&err),
            kind: err.code(),
            message: err.to_string(),
            hint,
            metadata: None,
        }
    }
}

impl From<IoError> for CliError {
    fn from(err: IoError) -> Self {
        let metadata = match &err {
            IoError::UnsupportedType { allowed, .. } => {
                Some(serde_json::json!({ "allowed_extensions": allowed }))
            }
            IoError::TooLarge { size, limit } => {
                Some(serde_json::json!({ "size": size, "max_bytes": limit }))
            }
            _ => None,
        };
        Self {
            code: io_exit_code(&err),
            kind: err.code(),
            message: err.to_string(),
            hint: None,
            metadata,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        CliError::usage("INVALID_CONFIG", err.to_string())
            .with_hint("check the file passed with --settings or AGINGBOARD_SETTINGS")
    }
}

// ============================================================================
// Setup
// ============================================================================

fn init_logging(verbose: bool, configured: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(configured))
            .unwrap_or_else(|_| EnvFilter::new(LogSettings::default().filter))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// An explicit settings file must load; the default one falls back to
/// defaults with a warning once logging is up.
fn load_settings(explicit: Option<&Path>, verbose: bool) -> Result<Settings, CliError> {
    let (settings, ignored) = match explicit {
        Some(path) => match Settings::load_from(path) {
            Ok(settings) => (settings, None),
            Err(err) => {
                init_logging(verbose, &LogSettings::default().filter);
                return Err(err.into());
            }
        },
        None => match Settings::discover() {
            Ok(settings) => (settings, None),
            Err(err) => (Settings::default(), Some(err)),
        },
    };

    init_logging(verbose, &settings.log.filter);
    if let Some(err) = ignored {
        tracing::warn!(
            path = %Settings::config_path().display(),
            error = %err,
            "ignoring settings file, using defaults"
        );
    }
    Ok(settings)
}

fn upload_policy(settings: &Settings) -> UploadPolicy {
    UploadPolicy {
        max_bytes: settings.upload.max_bytes,
        allowed_extensions: settings
            .upload
            .allowed_extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect(),
    }
}

fn new_session(settings: &Settings, as_of: Option<NaiveDate>) -> DatasetSession<TtlCache> {
    let session = DatasetSession::new(settings.columns.clone(), TtlCache::new(settings.cache_ttl()))
        .with_dataset_ttl(settings.dataset_ttl());
    match as_of {
        Some(date) => session.with_clock(FixedClock::at_midnight(date)),
        None => session,
    }
}

/// Read `file` into a fresh single-dataset session.
fn open_dataset(
    settings: &Settings,
    file: &Path,
    as_of: Option<NaiveDate>,
) -> Result<DatasetSession<TtlCache>, CliError> {
    let sheet = agingboard_io::load_rows(file, &upload_policy(settings))?;
    let mut session = new_session(settings, as_of);
    session.load(sheet.rows, file.display().to_string());
    Ok(session)
}

// ============================================================================
// Output
// ============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::internal(e.to_string()))?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::io(e.to_string()))
}

fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::internal(e.to_string()))?;
    std::fs::write(path, text + "\n")
        .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}

fn print_text(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(text.as_bytes()).map_err(|e| CliError::io(e.to_string()))
}

#[derive(Serialize)]
struct RecordsOutput<'a> {
    view: View,
    #[serde(rename = "daysProcessed")]
    records: &'a [agingboard_aging::ClassifiedRecord],
    discarded: agingboard_aging::classify::DiscardTally,
}

// ============================================================================
// aggregate / records / report
// ============================================================================

fn cmd_aggregate(
    settings: &Settings,
    file: &Path,
    view: &str,
    json: bool,
    output: Option<&Path>,
    as_of: Option<NaiveDate>,
) -> Result<(), CliError> {
    let view: View = view.parse()?;
    let mut session = open_dataset(settings, file, as_of)?;
    let areas = session.aggregate(view)?;

    if let Some(path) = output {
        write_json_file(path, &areas)?;
    }
    if json {
        print_json(&areas)
    } else {
        print_text(&table::render_aggregate(&areas))
    }
}

fn cmd_records(
    settings: &Settings,
    file: &Path,
    view: &str,
    json: bool,
    as_of: Option<NaiveDate>,
) -> Result<(), CliError> {
    let view: View = view.parse()?;
    if !view.has_records() {
        return Err(AgingError::AggregateOnlyView(view).into());
    }
    let mut session = open_dataset(settings, file, as_of)?;
    let classified = session.records(view)?;

    if json {
        print_json(&RecordsOutput {
            view,
            records: &classified.records,
            discarded: classified.discarded,
        })
    } else {
        print_text(&table::render_records(&classified))
    }
}

fn cmd_report(
    settings: &Settings,
    file: &Path,
    view: &str,
    output: Option<&Path>,
    as_of: Option<NaiveDate>,
) -> Result<(), CliError> {
    let view: View = view.parse()?;
    let mut session = open_dataset(settings, file, as_of)?;
    let report = session.report(view)?;

    match output {
        Some(path) => write_json_file(path, &report),
        None => print_json(&report),
    }
}

// ============================================================================
// session
// ============================================================================

fn cmd_session(settings: &Settings, as_of: Option<NaiveDate>) -> Result<(), CliError> {
    let mut dataset = new_session(settings, as_of);
    let policy = upload_policy(settings);
    let stdin = io::stdin();
    let stdout = io::stdout();
    session::run(stdin.lock(), stdout.lock(), &mut dataset, &policy)
        .map_err(|e| CliError::io(e.to_string()))
}
