//! Annotator name sanitization and annotation file naming.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Everything except letters, numbers, `_` and `-`. Combining marks are
/// neither letters nor numbers and are stripped.
const DISALLOWED_NAME_CHARS: &str = r"[^\p{L}\p{N}_-]";

static DISALLOWED_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Lower-case `name` and keep only letters, numbers, `_` and `-`.
pub fn sanitize_annotator_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    match DISALLOWED_RE
        .get_or_init(|| Regex::new(DISALLOWED_NAME_CHARS).ok())
        .as_ref()
    {
        Some(re) => re.replace_all(&lowered, "").into_owned(),
        None => lowered
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect(),
    }
}

/// Per-annotator file name: `<sanitized-name>_<YYYYMMDD>.json`.
pub fn annotations_filename(annotator: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}.json",
        sanitize_annotator_name(annotator),
        date.format("%Y%m%d")
    )
}
