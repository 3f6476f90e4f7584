//! Country/month/year extraction from uploaded report file names.

use std::sync::OnceLock;

use regex::Regex;

/// Anchored at the start only; anything after `.pdf` is ignored. The month
/// token is letters, numbers and `_`; combining marks do not count.
const FILENAME_PATTERN: &str = r"(?i)^([A-Z]{3})_forecast_([\p{L}\p{N}_]+)_(\d{4})\.pdf";

static FILENAME_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn filename_regex() -> Option<&'static Regex> {
    FILENAME_RE
        .get_or_init(|| Regex::new(FILENAME_PATTERN).ok())
        .as_ref()
}

/// Metadata parsed from `<CCC>_forecast_<month>_<YYYY>.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMetadata {
    pub country: String,
    pub month: String,
    pub year: String,
}

impl FilenameMetadata {
    /// Confirmation label, e.g. `NER - March 2026`.
    pub fn display_label(&self) -> String {
        format!("{} - {} {}", self.country, title_case(&self.month), self.year)
    }
}

/// Extract metadata from a file name.
///
/// `None` means the name does not follow the expected shape; callers must
/// check it before going further. The month token is not checked against a
/// calendar, so `13` or `foo` are accepted.
pub fn extract_pdf_metadata(filename: &str) -> Option<FilenameMetadata> {
    let caps = filename_regex()?.captures(filename)?;
    let country = caps.get(1)?.as_str().to_uppercase();
    let month = caps.get(2)?.as_str().to_lowercase();
    let year = caps.get(3)?.as_str().to_string();
    Some(FilenameMetadata {
        country,
        month,
        year,
    })
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
