//! annot-core: filename metadata, annotation store and session state for annot.

pub mod annotation;
pub mod config;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod names;
pub mod session;
pub mod store;

pub fn crate_label() -> &'static str {
    "annot-core"
}

#[cfg(test)]
mod tests {
    use super::crate_label;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "annot-core");
    }
}
