//! Flags shared by every command that resolves an annotation file.

use std::path::{Path, PathBuf};

use annot_core::config::{resolve_root, Config, StorageMode};
use annot_core::constants::SHARED_ANNOTATIONS_FILE;
use annot_core::session::Session;

use crate::AnnotBackend;

pub(crate) const TARGET_FLAGS_HELP: &str = "\
  -a, --annotator string   Annotator name (default: $ANNOT_ANNOTATOR)
      --shared             Use the shared annotations_app1.json collection
      --per-annotator      Use <annotator>_<YYYYMMDD>.json
      --root string        Directory holding annotation files (default: $ANNOT_ROOT)";

#[derive(Debug, Default)]
pub(crate) struct TargetArgs {
    pub annotator: Option<String>,
    pub mode: Option<StorageMode>,
    pub root: Option<String>,
}

impl TargetArgs {
    /// Consume a target flag at `args[*idx]`, advancing `idx` past its value.
    ///
    /// Returns `Ok(false)` when the token is not a target flag.
    pub fn take(&mut self, args: &[&str], idx: &mut usize) -> Result<bool, (i32, String)> {
        let token = args[*idx];
        match token {
            "--shared" => self.mode = Some(StorageMode::Shared),
            "--per-annotator" => self.mode = Some(StorageMode::PerAnnotator),
            "-a" | "--annotator" => {
                *idx += 1;
                self.annotator = Some(take_flag_value(args, *idx, "--annotator")?);
            }
            "--root" => {
                *idx += 1;
                self.root = Some(take_flag_value(args, *idx, "--root")?);
            }
            flag if flag.starts_with("--annotator=") || flag.starts_with("-a=") => {
                self.annotator = Some(inline_flag_value(flag));
            }
            flag if flag.starts_with("--root=") => {
                self.root = Some(inline_flag_value(flag));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Backend configuration with these flags applied on top.
    pub fn resolve(&self, backend: &dyn AnnotBackend) -> Result<Config, (i32, String)> {
        let mut config = backend.config().map_err(|e| (1, e))?;
        if let Some(root) = &self.root {
            config.root = resolve_root(Path::new(root)).map_err(|e| (1, e.to_string()))?;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(name) = &self.annotator {
            let trimmed = name.trim();
            config.annotator = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        Ok(config)
    }

    /// Session for commands that need a resolved annotation file.
    pub fn session(&self, backend: &dyn AnnotBackend) -> Result<Session, (i32, String)> {
        let config = self.resolve(backend)?;
        if config.annotator.is_none() {
            return Err((
                1,
                "annotator name required (use --annotator or ANNOT_ANNOTATOR)".to_string(),
            ));
        }
        Ok(Session::from_config(&config))
    }

    /// Annotation file for read-only commands. The shared collection needs no
    /// annotator name.
    pub fn annotation_file(&self, backend: &dyn AnnotBackend) -> Result<PathBuf, (i32, String)> {
        let config = self.resolve(backend)?;
        if config.mode == StorageMode::Shared {
            return Ok(config.root.join(SHARED_ANNOTATIONS_FILE));
        }
        let mut session = self.session(backend)?;
        session
            .annotations_path(backend.today())
            .map_err(|e| (1, e.to_string()))
    }
}

pub(crate) fn take_flag_value(
    args: &[&str],
    idx: usize,
    flag: &str,
) -> Result<String, (i32, String)> {
    args.get(idx)
        .map(|v| (*v).to_string())
        .ok_or_else(|| (2, format!("missing value for {flag}")))
}

pub(crate) fn inline_flag_value(flag: &str) -> String {
    flag.split_once('=')
        .map(|(_, value)| value.to_string())
        .unwrap_or_default()
}

/// Parse arguments that consist of target flags, `--json` and nothing else.
pub(crate) fn parse_target_only(
    args: &[&str],
    help: &str,
) -> Result<(TargetArgs, bool), (i32, String)> {
    let mut target = TargetArgs::default();
    let mut json = false;
    let mut idx = 0usize;
    while idx < args.len() {
        if target.take(args, &mut idx)? {
            idx += 1;
            continue;
        }
        match args[idx] {
            "-h" | "--help" | "help" => return Err((0, help.to_string())),
            "--json" => json = true,
            "" => {}
            flag if flag.starts_with('-') => return Err((2, format!("unknown flag: {flag}"))),
            other => return Err((2, format!("unexpected argument: {other}"))),
        }
        idx += 1;
    }
    Ok((target, json))
}

/// Map a `(code, message)` error to command output; code 0 is help text.
pub(crate) fn error_output((exit_code, message): (i32, String)) -> crate::CommandOutput {
    if exit_code == 0 {
        crate::CommandOutput::ok(format!("{message}\n"))
    } else {
        crate::CommandOutput::fail(exit_code, &message)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::tests_common::MockAnnotBackend;

    #[test]
    fn parses_all_target_flags() {
        let args = ["--per-annotator", "-a", "Alice", "--root=/tmp", "--json"];
        let (target, json) = parse_target_only(&args, "help").expect("parse");
        assert_eq!(target.mode, Some(StorageMode::PerAnnotator));
        assert_eq!(target.annotator.as_deref(), Some("Alice"));
        assert_eq!(target.root.as_deref(), Some("/tmp"));
        assert!(json);
    }

    #[test]
    fn missing_flag_value_is_usage_error() {
        let err = parse_target_only(&["--annotator"], "help").unwrap_err();
        assert_eq!(err.0, 2);
        assert_eq!(err.1, "missing value for --annotator");
    }

    #[test]
    fn unknown_flag_and_positional_are_rejected() {
        assert_eq!(parse_target_only(&["--bogus"], "help").unwrap_err().0, 2);
        assert_eq!(parse_target_only(&["extra"], "help").unwrap_err().0, 2);
    }

    #[test]
    fn flags_override_backend_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = MockAnnotBackend::new().with_root(dir.path());
        let target = TargetArgs {
            annotator: Some("  bob ".to_string()),
            mode: Some(StorageMode::PerAnnotator),
            root: None,
        };
        let config = target.resolve(&backend).expect("resolve");
        assert_eq!(config.annotator.as_deref(), Some("bob"));
        assert_eq!(config.mode, StorageMode::PerAnnotator);
    }

    #[test]
    fn annotation_file_by_mode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = MockAnnotBackend::new().with_root(dir.path());
        let shared = TargetArgs::default().annotation_file(&backend).expect("shared");
        assert_eq!(shared, dir.path().join(SHARED_ANNOTATIONS_FILE));

        let per = TargetArgs {
            annotator: Some("Jean-Pierre O'Brien".to_string()),
            mode: Some(StorageMode::PerAnnotator),
            root: None,
        };
        assert_eq!(
            per.annotation_file(&backend).expect("per-annotator"),
            dir.path().join("jean-pierreobrien_20260314.json")
        );

        let anonymous = TargetArgs {
            mode: Some(StorageMode::PerAnnotator),
            ..TargetArgs::default()
        };
        assert_eq!(anonymous.annotation_file(&backend).unwrap_err().0, 1);
    }

    #[test]
    fn session_requires_annotator() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = MockAnnotBackend::new().with_root(dir.path());
        let err = TargetArgs::default().session(&backend).unwrap_err();
        assert_eq!(err.0, 1);
        assert!(err.1.contains("annotator name required"));
    }
}
