use annot_core::store::export_annotations;

use crate::target::{error_output, parse_target_only, TARGET_FLAGS_HELP};
use crate::{AnnotBackend, CommandOutput};

/// Print the collection exactly as it would be downloaded.
pub fn run_export_for_test(args: &[&str], backend: &dyn AnnotBackend) -> CommandOutput {
    let help = format!("{HELP_TEXT}{TARGET_FLAGS_HELP}");
    let result = parse_target_only(args, &help)
        .and_then(|(target, _json)| target.annotation_file(backend))
        .and_then(|path| export_annotations(&path).map_err(|e| (1, e.to_string())));
    match result {
        Ok(json) => CommandOutput::ok(format!("{json}\n")),
        Err(err) => error_output(err),
    }
}

const HELP_TEXT: &str = "\
Print the whole annotation collection as JSON

Usage:
  annot export [flags]

Flags:
  -h, --help               help for export
";
