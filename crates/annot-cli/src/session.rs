//! Interactive annotation loop over line input.
//!
//! Each cycle loads one report, shows its metadata and collects a summary
//! terminated by a line holding only `.`. An empty report path or end of
//! input finishes the session.

use annot_core::error::SessionError;
use annot_core::session::Session;

use crate::parse::unparseable_message;
use crate::target::{error_output, parse_target_only, TARGET_FLAGS_HELP};
use crate::{AnnotBackend, CommandOutput};

const SUMMARY_TERMINATOR: &str = ".";

pub fn run_session_for_test(args: &[&str], backend: &dyn AnnotBackend) -> CommandOutput {
    let help = format!("{HELP_TEXT}{TARGET_FLAGS_HELP}");
    let (target, _json) = match parse_target_only(args, &help) {
        Ok(v) => v,
        Err(err) => return error_output(err),
    };
    let config = match target.resolve(backend) {
        Ok(c) => c,
        Err(err) => return error_output(err),
    };

    let mut session = Session::from_config(&config);
    if session.annotator().is_empty() {
        backend.emit("annotator name: ");
        let name = backend.read_line().unwrap_or_default();
        session.set_annotator(&name);
        if session.annotator().is_empty() {
            return error_output((1, "annotator name required".to_string()));
        }
    }

    let today = backend.today();
    match session.annotations_path(today) {
        Ok(path) => backend.emit(&format!(
            "annotating as {}; saving to {}\n",
            session.annotator(),
            path.display()
        )),
        Err(e) => return error_output((1, e.to_string())),
    }

    loop {
        backend.emit("\nreport path (empty to finish): ");
        let Some(line) = backend.read_line() else {
            break;
        };
        let report = line.trim();
        if report.is_empty() {
            break;
        }

        let upload = match backend.read_upload(report) {
            Ok(u) => u,
            Err(e) => {
                backend.emit(&format!("error: {e}\n"));
                continue;
            }
        };
        let size = upload.bytes.len();
        match session.upload(upload) {
            Ok(metadata) => {
                backend.emit(&format!("loaded: {} ({size} bytes)\n", metadata.display_label()));
            }
            Err(SessionError::UnparseableFilename { filename }) => {
                backend.emit(&format!("{}\n", unparseable_message(&filename)));
                continue;
            }
            Err(e) => {
                backend.emit(&format!("error: {e}\n"));
                continue;
            }
        }

        if !collect_and_submit(&mut session, backend) {
            break;
        }
    }

    let count = session.session_annotations().len();
    backend.emit(&format!("\nsession saved {count} annotation(s)\n"));
    CommandOutput::ok(String::new())
}

/// Prompt for summaries until one is saved. Returns `false` once input ends.
fn collect_and_submit(session: &mut Session, backend: &dyn AnnotBackend) -> bool {
    let today = backend.today();
    loop {
        backend.emit(&format!(
            "summary (finish with a line containing only '{SUMMARY_TERMINATOR}'):\n"
        ));
        let (summary, input_open) = read_summary(backend);

        match session.submit(&summary, today) {
            Ok(path) => {
                backend.emit(&format!("saved annotation to {}\n", path.display()));
                show_progress(session, backend);
                return input_open;
            }
            Err(SessionError::EmptySummary) => {
                backend.emit("please enter a summary before submitting\n");
            }
            Err(e) => backend.emit(&format!("error: {e}\n")),
        }
        if !input_open {
            return false;
        }
    }
}

/// Read lines up to the terminator. The flag is `false` when input ended first.
fn read_summary(backend: &dyn AnnotBackend) -> (String, bool) {
    let mut lines: Vec<String> = Vec::new();
    loop {
        match backend.read_line() {
            Some(line) if line.trim_end() == SUMMARY_TERMINATOR => return (lines.join("\n"), true),
            Some(line) => lines.push(line),
            None => return (lines.join("\n"), false),
        }
    }
}

fn show_progress(session: &mut Session, backend: &dyn AnnotBackend) {
    let records: Vec<serde_json::Value> = session
        .session_annotations()
        .iter()
        .map(|a| a.to_value())
        .collect();
    if let Ok(encoded) = serde_json::to_string_pretty(&records) {
        backend.emit(&format!("your annotations this session:\n{encoded}\n"));
    }
    if let Ok(stored) = session.stored_annotations(backend.today()) {
        backend.emit(&format!("total annotations in file: {}\n", stored.len()));
    }
}

const HELP_TEXT: &str = "\
Annotate reports interactively

Usage:
  annot session [flags]

Flags:
  -h, --help               help for session
";
