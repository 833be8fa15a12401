//! Line-protocol session over stdin/stdout.
//!
//! One command per input line, one JSON value per output line. A failed
//! command answers with the error envelope and the loop keeps going; only
//! `quit`, end of input, or a broken pipe end the session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use agingboard_aging::cache::AggregateCache;
use agingboard_aging::{DatasetSession, View};
use agingboard_io::UploadPolicy;
use serde_json::{json, Value};

use crate::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Load(PathBuf),
    Aggregate(View),
    Records(View),
    Report(View),
    Status,
    Clear,
    Quit,
}

impl Request {
    fn parse(line: &str) -> Result<Self, CliError> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "load" => Ok(Request::Load(PathBuf::from(required(command, arg, "path")?))),
            "aggregate" => Ok(Request::Aggregate(required(command, arg, "view")?.parse()?)),
            "records" => Ok(Request::Records(required(command, arg, "view")?.parse()?)),
            "report" => Ok(Request::Report(required(command, arg, "view")?.parse()?)),
            "status" => Ok(Request::Status),
            "clear" => Ok(Request::Clear),
            "quit" | "exit" => Ok(Request::Quit),
            other => Err(CliError::usage(
                "UNKNOWN_COMMAND",
                format!("unknown command '{}'", other),
            )),
        }
    }
}

fn required<'a>(command: &str, arg: &'a str, what: &str) -> Result<&'a str, CliError> {
    if arg.is_empty() {
        Err(CliError::usage(
            "MISSING_ARGUMENT",
            format!("'{}' needs a {}", command, what),
        ))
    } else {
        Ok(arg)
    }
}

pub fn run<R, W, C>(
    input: R,
    mut output: W,
    session: &mut DatasetSession<C>,
    policy: &UploadPolicy,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    C: AggregateCache,
{
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let response = match Request::parse(line) {
            Ok(Request::Quit) => break,
            Ok(request) => handle(request, session, policy),
            Err(err) => Err(err),
        };
        let value = response.unwrap_or_else(|err| {
            tracing::debug!(code = err.kind, message = %err.message, "session command failed");
            err.to_json()
        });

        writeln!(output, "{}", value)?;
        output.flush()?;
    }
    Ok(())
}

fn handle<C: AggregateCache>(
    request: Request,
    session: &mut DatasetSession<C>,
    policy: &UploadPolicy,
) -> Result<Value, CliError> {
    match request {
        Request::Load(path) => {
            let sheet = agingboard_io::load_rows(&path, policy)?;
            let rows = sheet.rows.len();
            let version = session.load(sheet.rows, path.display().to_string());
            Ok(json!({
                "loaded": {
                    "version": version,
                    "source": path.display().to_string(),
                    "sheet": sheet.sheet,
                    "rows": rows,
                }
            }))
        }
        Request::Aggregate(view) => {
            let areas = session.aggregate(view)?;
            Ok(json!({ "view": view, "BACount": areas }))
        }
        Request::Records(view) => {
            let classified = session.records(view)?;
            Ok(json!({
                "view": view,
                "daysProcessed": classified.records,
                "discarded": classified.discarded,
            }))
        }
        Request::Report(view) => {
            let report = session.report(view)?;
            serde_json::to_value(&report).map_err(|e| CliError::internal(e.to_string()))
        }
        Request::Status => Ok(json!({ "status": session.status() })),
        Request::Clear => Ok(json!({ "cleared": session.clear() })),
        Request::Quit => Ok(Value::Null),
    }
}
