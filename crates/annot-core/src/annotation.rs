use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::metadata::FilenameMetadata;

/// One submitted summary for a parsed report.
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub annotator: String,
    pub country: String,
    pub month: String,
    pub year: String,
    pub summary: String,
}

impl Annotation {
    pub fn new(annotator: &str, metadata: &FilenameMetadata, summary: &str) -> Self {
        Self {
            annotator: annotator.to_string(),
            country: metadata.country.clone(),
            month: metadata.month.clone(),
            year: metadata.year.clone(),
            summary: summary.to_string(),
        }
    }

    /// Typed view of a stored record; `None` when any field is missing or
    /// not a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "annotator": self.annotator,
            "country": self.country,
            "month": self.month,
            "year": self.year,
            "summary": self.summary,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use serde_json::json;

    fn sample() -> Annotation {
        Annotation {
            annotator: "alice".to_string(),
            country: "NER".to_string(),
            month: "march".to_string(),
            year: "2026".to_string(),
            summary: "Risk rising".to_string(),
        }
    }

    #[test]
    fn to_value_keeps_key_order() {
        let value = sample().to_value();
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["annotator", "country", "month", "year", "summary"],
        );
    }

    #[test]
    fn from_value_rejects_incomplete_records() {
        assert_eq!(Annotation::from_value(&sample().to_value()), Some(sample()));
        assert_eq!(Annotation::from_value(&json!({"annotator": "bob"})), None);
        assert_eq!(Annotation::from_value(&json!("text")), None);
    }

    #[test]
    fn new_copies_metadata() {
        let meta = FilenameMetadata {
            country: "NER".to_string(),
            month: "march".to_string(),
            year: "2026".to_string(),
        };
        assert_eq!(Annotation::new("alice", &meta, "Risk rising"), sample());
    }
}
