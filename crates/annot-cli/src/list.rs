use std::io::Write;
use std::path::Path;

use annot_core::store::load_annotations;
use serde_json::Value;
use tabwriter::TabWriter;

use crate::target::{error_output, parse_target_only, TARGET_FLAGS_HELP};
use crate::{AnnotBackend, CommandOutput};

const SUMMARY_PREVIEW_CHARS: usize = 60;

pub fn run_list_for_test(args: &[&str], backend: &dyn AnnotBackend) -> CommandOutput {
    let help = format!("{HELP_TEXT}{TARGET_FLAGS_HELP}");
    let (target, json) = match parse_target_only(args, &help) {
        Ok(v) => v,
        Err(err) => return error_output(err),
    };
    let path = match target.annotation_file(backend) {
        Ok(p) => p,
        Err(err) => return error_output(err),
    };
    let records = load_annotations(&path);

    if json {
        let payload = serde_json::json!({
            "file": path.display().to_string(),
            "total": records.len(),
            "annotations": records,
        });
        return match serde_json::to_string_pretty(&payload) {
            Ok(encoded) => CommandOutput::ok(format!("{encoded}\n")),
            Err(e) => error_output((1, format!("encode annotations: {e}"))),
        };
    }

    CommandOutput::ok(format_list_table(&path, &records))
}

fn format_list_table(path: &Path, records: &[Value]) -> String {
    let mut tw = TabWriter::new(Vec::new()).padding(2);
    let _ = writeln!(&mut tw, "ANNOTATOR\tCOUNTRY\tMONTH\tYEAR\tSUMMARY");
    for record in records {
        let _ = writeln!(
            &mut tw,
            "{}\t{}\t{}\t{}\t{}",
            field(record, "annotator"),
            field(record, "country"),
            field(record, "month"),
            field(record, "year"),
            summary_preview(&field(record, "summary")),
        );
    }
    let mut out = String::from_utf8_lossy(&tabwriter_into_bytes(tw)).into_owned();
    out.push_str(&format!("\ntotal: {}\nfile: {}\n", records.len(), path.display()));
    out
}

/// String field of a stored record, `-` when missing, blank or not a string.
fn field(record: &Value, key: &str) -> String {
    match record.get(key).and_then(Value::as_str).map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

fn summary_preview(summary: &str) -> String {
    let first_line = summary.lines().next().unwrap_or_default();
    let multi_line = summary.lines().nth(1).is_some();
    let mut preview: String = first_line
        .replace('\t', " ")
        .chars()
        .take(SUMMARY_PREVIEW_CHARS)
        .collect();
    if multi_line || first_line.chars().count() > SUMMARY_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

fn tabwriter_into_bytes(mut tw: TabWriter<Vec<u8>>) -> Vec<u8> {
    loop {
        match tw.into_inner() {
            Ok(v) => return v,
            Err(e) => tw = e.into_inner(),
        }
    }
}

const HELP_TEXT: &str = "\
List stored annotations

Usage:
  annot list [flags]

Flags:
  -h, --help               help for list
      --json               Output as JSON
";
