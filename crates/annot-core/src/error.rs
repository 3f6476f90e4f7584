use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("encode annotations: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("create annotation dir {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("rename {} -> {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("annotator name required")]
    MissingAnnotator,
    #[error("no report loaded")]
    NoUpload,
    #[error("cannot parse file name: {filename}")]
    UnparseableFilename { filename: String },
    #[error("summary is required")]
    EmptySummary,
    #[error("save annotation: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid storage mode: {0} (expected shared or per-annotator)")]
    InvalidMode(String),
    #[error("resolve root {}: {source}", .path.display())]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
