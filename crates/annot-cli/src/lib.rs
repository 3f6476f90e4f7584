//! annot-cli: command-line surface for annot.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::OnceLock;

use annot_core::config::Config;
use annot_core::session::Upload;
use chrono::NaiveDate;

pub fn crate_label() -> &'static str {
    "annot-cli"
}

static VERSION: OnceLock<String> = OnceLock::new();

/// Set the version string for `--version` output.
pub fn set_version(version: &str) {
    let _ = VERSION.set(version.to_string());
}

fn get_version() -> &'static str {
    VERSION.get().map(|s| s.as_str()).unwrap_or("dev")
}

fn help_text() -> String {
    "\
annot records summaries of conflict-forecast reports as JSON annotations.

Usage:
  annot [command]

Available Commands:
  export      Print the whole annotation collection as JSON
  help        Help about any command
  list        List stored annotations
  parse       Extract country, month and year from a report file name
  path        Print the annotation file in use
  session     Annotate reports interactively
  submit      Save one summary for a report

Flags:
  -h, --help      help for annot
  -v, --version   version for annot

Environment:
  ANNOT_ROOT        Directory holding annotation files (default: current directory)
  ANNOT_ANNOTATOR   Annotator name
  ANNOT_MODE        shared (default) or per-annotator
  ANNOT_LOG         Log filter, e.g. debug or annot_core=info

Use \"annot [command] --help\" for more information about a command.\n"
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub(crate) fn ok(stdout: String) -> Self {
        Self {
            stdout,
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub(crate) fn fail(exit_code: i32, message: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("{message}\n"),
            exit_code,
        }
    }
}

/// Everything a command needs from the outside world.
pub trait AnnotBackend {
    /// Base configuration before command-line overrides.
    fn config(&self) -> Result<Config, String>;
    fn today(&self) -> NaiveDate;
    /// Read a report from disk; the upload keeps only the file name.
    fn read_upload(&self, path: &str) -> Result<Upload, String>;
    fn read_file(&self, path: &str) -> Result<String, String>;
    /// Next input line without its line terminator; `None` at end of input.
    fn read_line(&self) -> Option<String>;
    /// Write interactive output immediately.
    fn emit(&self, text: &str);
}

pub struct FilesystemAnnotBackend;

impl AnnotBackend for FilesystemAnnotBackend {
    fn config(&self) -> Result<Config, String> {
        Config::from_env().map_err(|e| e.to_string())
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn read_upload(&self, path: &str) -> Result<Upload, String> {
        let bytes = std::fs::read(path).map_err(|e| format!("read report {path}: {e}"))?;
        let filename = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        Ok(Upload { filename, bytes })
    }

    fn read_file(&self, path: &str) -> Result<String, String> {
        std::fs::read_to_string(path).map_err(|e| format!("read file: {e}"))
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }

    fn emit(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

pub mod export;
pub mod list;
pub mod parse;
pub mod path;
pub mod session;
pub mod submit;
pub(crate) mod target;

#[cfg(test)]
pub(crate) mod tests_common;

pub fn run_cli_for_test(args: &[&str], backend: &dyn AnnotBackend) -> CommandOutput {
    let Some((cmd, rest)) = args.split_first() else {
        return CommandOutput::ok(help_text());
    };
    tracing::debug!(command = %cmd, args = rest.len(), "dispatch");

    match *cmd {
        "--help" | "-h" | "help" => CommandOutput::ok(help_text()),
        "--version" | "-v" => CommandOutput::ok(format!("annot version {}\n", get_version())),
        "export" => export::run_export_for_test(rest, backend),
        "list" | "ls" => list::run_list_for_test(rest, backend),
        "parse" => parse::run_parse_for_test(rest),
        "path" => path::run_path_for_test(rest, backend),
        "session" => session::run_session_for_test(rest, backend),
        "submit" => submit::run_submit_for_test(rest, backend),
        _ => CommandOutput::fail(1, &format!("Error: unknown command \"{cmd}\" for \"annot\"")),
    }
}

pub fn run_cli(args: &[String], backend: &dyn AnnotBackend) -> CommandOutput {
    let refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    run_cli_for_test(&refs, backend)
}
