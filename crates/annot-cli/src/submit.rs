//! One-shot submission: load a report, attach a summary, save.

use annot_core::error::SessionError;

use crate::parse::unparseable_message;
use crate::target::{
    error_output, inline_flag_value, take_flag_value, TargetArgs, TARGET_FLAGS_HELP,
};
use crate::{AnnotBackend, CommandOutput};

pub fn run_submit_for_test(args: &[&str], backend: &dyn AnnotBackend) -> CommandOutput {
    match execute_submit(args, backend) {
        Ok(output) => output,
        Err(err) => error_output(err),
    }
}

fn execute_submit(
    args: &[&str],
    backend: &dyn AnnotBackend,
) -> Result<CommandOutput, (i32, String)> {
    let parsed = parse_submit_args(args)?;
    let summary = resolve_summary(&parsed, backend)?;

    let mut session = parsed.target.session(backend)?;
    let upload = backend.read_upload(&parsed.report).map_err(|e| (1, e))?;
    let size = upload.bytes.len();

    let metadata = session.upload(upload).map_err(|e| match e {
        SessionError::UnparseableFilename { filename } => (1, unparseable_message(&filename)),
        other => (1, other.to_string()),
    })?;

    let today = backend.today();
    let path = session.submit(&summary, today).map_err(|e| match e {
        SessionError::EmptySummary => (2, "summary is required".to_string()),
        other => (1, other.to_string()),
    })?;

    if parsed.json {
        let record = session
            .session_annotations()
            .last()
            .map(|a| a.to_value())
            .unwrap_or_default();
        let encoded = serde_json::to_string_pretty(&record)
            .map_err(|e| (1, format!("encode annotation: {e}")))?;
        return Ok(CommandOutput::ok(format!("{encoded}\n")));
    }

    Ok(CommandOutput::ok(format!(
        "loaded: {} ({size} bytes)\nsaved annotation to {}\n",
        metadata.display_label(),
        path.display()
    )))
}

fn resolve_summary(
    parsed: &ParsedSubmitArgs,
    backend: &dyn AnnotBackend,
) -> Result<String, (i32, String)> {
    let file_path = parsed.file.trim();
    if !file_path.is_empty() && !parsed.summary.is_empty() {
        return Err((
            2,
            "provide either a summary argument or --file, not both".to_string(),
        ));
    }
    if file_path.is_empty() {
        return Ok(parsed.summary.clone());
    }
    backend.read_file(file_path).map_err(|e| (1, e))
}

#[derive(Debug, Default)]
struct ParsedSubmitArgs {
    report: String,
    summary: String,
    file: String,
    json: bool,
    target: TargetArgs,
}

fn parse_submit_args(args: &[&str]) -> Result<ParsedSubmitArgs, (i32, String)> {
    let mut parsed = ParsedSubmitArgs::default();
    let mut idx = 0usize;
    let mut positional_count = 0u32;

    while idx < args.len() {
        if parsed.target.take(args, &mut idx)? {
            idx += 1;
            continue;
        }
        match args[idx] {
            "-h" | "--help" | "help" => return Err((0, help_text())),
            "--json" => parsed.json = true,
            flag if flag.starts_with("--file=") || flag.starts_with("-f=") => {
                parsed.file = inline_flag_value(flag);
            }
            "-f" | "--file" => {
                idx += 1;
                parsed.file = take_flag_value(args, idx, "--file")?;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err((2, format!("unknown flag: {flag}")));
            }
            positional => {
                match positional_count {
                    0 => parsed.report = positional.to_string(),
                    1 => parsed.summary = positional.to_string(),
                    _ => return Err((2, "too many arguments".to_string())),
                }
                positional_count += 1;
            }
        }
        idx += 1;
    }

    if parsed.report.is_empty() {
        return Err((2, "report path is required".to_string()));
    }
    Ok(parsed)
}

fn help_text() -> String {
    format!("{HELP_TEXT}{TARGET_FLAGS_HELP}")
}

const HELP_TEXT: &str = "\
Save one summary for a report

Usage:
  annot submit <report.pdf> [summary] [flags]

Arguments:
  report    PDF named COUNTRY_forecast_month_year.pdf
  summary   Summary text (optional if --file is used)

Flags:
  -f, --file string        Read the summary from a file
      --json               Output the saved annotation as JSON
  -h, --help               help for submit
";

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::tests_common::MockAnnotBackend;
    use annot_core::constants::SHARED_ANNOTATIONS_FILE;
    use annot_core::store::load_annotations;

    #[test]
    fn submit_saves_to_shared_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = MockAnnotBackend::new()
            .with_root(dir.path())
            .with_annotator("alice")
            .with_file("reports/NER_forecast_march_2026.pdf", b"%PDF-1.7");

        let out = run_submit_for_test(
            &["reports/NER_forecast_march_2026.pdf", "Risk rising"],
            &backend,
        );
        assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
        let path = dir.path().join(SHARED_ANNOTATIONS_FILE);
        assert_eq!(
            out.stdout,
            format!(
                "loaded: NER - March 2026 (8 bytes)\nsaved annotation to {}\n",
                path.display()
            )
        );
        let stored = load_annotations(&path);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["summary"], "Risk rising");
    }

    #[test]
    fn submit_reads_summary_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = MockAnnotBackend::new()
            .with_root(dir.path())
            .with_file("NER_forecast_march_2026.pdf", b"%PDF")
            .with_file("summary.txt", b"Line one\nLine two\n");

        let out = run_submit_for_test(
            &[
                "NER_forecast_march_2026.pdf",
                "-f",
                "summary.txt",
                "--annotator",
                "bob",
                "--json",
            ],
            &backend,
        );
        assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
        let value: serde_json::Value = serde_json::from_str(&out.stdout).expect("json");
        assert_eq!(value["annotator"], "bob");
        assert_eq!(value["summary"], "Line one\nLine two\n");
    }

    #[test]
    fn submit_rejects_summary_and_file_together() {
        let backend = MockAnnotBackend::new().with_annotator("alice");
        let out = run_submit_for_test(
            &["NER_forecast_march_2026.pdf", "text", "--file=s.txt"],
            &backend,
        );
        assert_eq!(out.exit_code, 2);
        assert!(out.stderr.contains("not both"));
    }

    #[test]
    fn submit_blank_summary_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = MockAnnotBackend::new()
            .with_root(dir.path())
            .with_annotator("alice")
            .with_file("NER_forecast_march_2026.pdf", b"%PDF");

        let out = run_submit_for_test(&["NER_forecast_march_2026.pdf", "   "], &backend);
        assert_eq!(out.exit_code, 2);
        assert_eq!(out.stderr, "summary is required\n");
        assert!(!dir.path().join(SHARED_ANNOTATIONS_FILE).exists());
    }

    #[test]
    fn submit_unparseable_name_is_blocked() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = MockAnnotBackend::new()
            .with_root(dir.path())
            .with_annotator("alice")
            .with_file("foo_bar.pdf", b"%PDF");

        let out = run_submit_for_test(&["foo_bar.pdf", "Risk rising"], &backend);
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.starts_with("cannot parse file name: foo_bar.pdf\n"));
        assert!(!dir.path().join(SHARED_ANNOTATIONS_FILE).exists());
    }

    #[test]
    fn submit_requires_report_and_annotator() {
        let backend = MockAnnotBackend::new();
        assert_eq!(run_submit_for_test(&[], &backend).exit_code, 2);

        let out = run_submit_for_test(&["NER_forecast_march_2026.pdf", "x"], &backend);
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.contains("annotator name required"));
    }

    #[test]
    fn submit_help_lists_target_flags() {
        let backend = MockAnnotBackend::new();
        let out = run_submit_for_test(&["--help"], &backend);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("--per-annotator"));
    }
}
