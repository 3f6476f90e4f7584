//! Environment-driven configuration.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{ENV_ANNOTATOR, ENV_MODE, ENV_ROOT};
use crate::error::ConfigError;

/// Where annotations for an annotator are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// One collection for everybody (`annotations_app1.json`).
    #[default]
    Shared,
    /// One collection per annotator and day.
    PerAnnotator,
}

impl FromStr for StorageMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "per-annotator" | "per_annotator" | "annotator" => Ok(Self::PerAnnotator),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => f.write_str("shared"),
            Self::PerAnnotator => f.write_str("per-annotator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: PathBuf,
    pub mode: StorageMode,
    pub annotator: Option<String>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: StorageMode::default(),
            annotator: None,
        }
    }

    /// Read `ANNOT_ROOT`, `ANNOT_MODE` and `ANNOT_ANNOTATOR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from a variable lookup.
    ///
    /// Unset or blank variables fall back to the current directory, shared
    /// mode and no annotator.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let root = match var(ENV_ROOT) {
            Some(raw) => resolve_root(Path::new(&raw))?,
            None => {
                let cwd = env::current_dir().map_err(|source| ConfigError::Root {
                    path: PathBuf::from("."),
                    source,
                })?;
                resolve_root(&cwd)?
            }
        };
        let mode = match var(ENV_MODE) {
            Some(raw) => raw.parse()?,
            None => StorageMode::default(),
        };
        Ok(Self {
            root,
            mode,
            annotator: var(ENV_ANNOTATOR),
        })
    }
}

/// Canonicalize `root` and require it to be a directory.
pub fn resolve_root(root: &Path) -> Result<PathBuf, ConfigError> {
    let abs = root.canonicalize().map_err(|source| ConfigError::Root {
        path: root.to_path_buf(),
        source,
    })?;
    if !abs.is_dir() {
        return Err(ConfigError::NotADirectory(abs));
    }
    Ok(abs)
}
