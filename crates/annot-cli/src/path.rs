use crate::target::{error_output, parse_target_only, TARGET_FLAGS_HELP};
use crate::{AnnotBackend, CommandOutput};

pub fn run_path_for_test(args: &[&str], backend: &dyn AnnotBackend) -> CommandOutput {
    let help = format!("{HELP_TEXT}{TARGET_FLAGS_HELP}");
    let result = parse_target_only(args, &help).and_then(|(target, _json)| {
        target.annotation_file(backend)
    });
    match result {
        Ok(path) => CommandOutput::ok(format!("{}\n", path.display())),
        Err(err) => error_output(err),
    }
}

const HELP_TEXT: &str = "\
Print the annotation file in use

Usage:
  annot path [flags]

Flags:
  -h, --help               help for path
";
