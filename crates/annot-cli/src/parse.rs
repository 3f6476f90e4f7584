use annot_core::constants::EXPECTED_FORMAT_HINT;
use annot_core::metadata::extract_pdf_metadata;

use crate::target::error_output;
use crate::CommandOutput;

pub fn run_parse_for_test(args: &[&str]) -> CommandOutput {
    let mut json = false;
    let mut names: Vec<&str> = Vec::new();
    for arg in args {
        match *arg {
            "-h" | "--help" | "help" => return CommandOutput::ok(format!("{HELP_TEXT}\n")),
            "--json" => json = true,
            v if v.starts_with('-') && v.len() > 1 => {
                return error_output((2, format!("unknown flag: {v}")));
            }
            v => names.push(v),
        }
    }
    if names.len() != 1 {
        return error_output((2, format!("expected 1 arg, got {}", names.len())));
    }
    let filename = names[0];

    let Some(metadata) = extract_pdf_metadata(filename) else {
        return error_output((1, unparseable_message(filename)));
    };

    if json {
        let payload = serde_json::json!({
            "country": metadata.country,
            "month": metadata.month,
            "year": metadata.year,
        });
        return match serde_json::to_string_pretty(&payload) {
            Ok(encoded) => CommandOutput::ok(format!("{encoded}\n")),
            Err(e) => error_output((1, format!("encode metadata: {e}"))),
        };
    }

    CommandOutput::ok(format!(
        "country: {}\nmonth:   {}\nyear:    {}\n",
        metadata.country, metadata.month, metadata.year
    ))
}

/// Two-line message shown for a file name that does not parse.
pub(crate) fn unparseable_message(filename: &str) -> String {
    format!("cannot parse file name: {filename}\nexpected format: {EXPECTED_FORMAT_HINT}")
}

const HELP_TEXT: &str = "\
Extract country, month and year from a report file name

Usage:
  annot parse <filename> [flags]

Flags:
  -h, --help   help for parse
      --json   Output as JSON";
