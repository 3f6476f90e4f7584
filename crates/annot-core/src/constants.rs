pub const ENV_ROOT: &str = "ANNOT_ROOT";
pub const ENV_ANNOTATOR: &str = "ANNOT_ANNOTATOR";
pub const ENV_MODE: &str = "ANNOT_MODE";
pub const ENV_LOG: &str = "ANNOT_LOG";

/// Annotation file used when every annotator writes to one collection.
pub const SHARED_ANNOTATIONS_FILE: &str = "annotations_app1.json";

pub const EXPECTED_FORMAT_HINT: &str =
    "COUNTRY_forecast_month_year.pdf (e.g. NER_forecast_march_2026.pdf)";
