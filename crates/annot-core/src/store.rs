//! JSON-file annotation store.
//!
//! The collection is one pretty-printed JSON array per file. Every append is
//! a full read-modify-write of the file with no locking: two writers racing
//! on the same file can lose one of the records (last rewrite wins).

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::annotation::Annotation;
use crate::error::StoreError;

/// Load the collection stored at `path`.
///
/// Any failure to read or parse (missing file, I/O error, invalid JSON, a
/// top-level value that is not an array) yields an empty collection. Records
/// are returned as stored, without shape checks.
pub fn load_annotations(path: &Path) -> Vec<Value> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            tracing::debug!(
                path = %path.display(),
                error = %err,
                "annotation file unreadable; starting empty"
            );
            return Vec::new();
        }
    };
    match serde_json::from_str::<Value>(&data) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            tracing::debug!(
                path = %path.display(),
                "annotation file is not an array; starting empty"
            );
            Vec::new()
        }
        Err(err) => {
            tracing::debug!(
                path = %path.display(),
                error = %err,
                "annotation file is not valid json; starting empty"
            );
            Vec::new()
        }
    }
}

/// Append `annotation` to the collection at `path`, rewriting the whole file.
///
/// Returns the path written.
pub fn save_annotation(path: &Path, annotation: &Annotation) -> Result<PathBuf, StoreError> {
    let mut records = load_annotations(path);
    records.push(annotation.to_value());
    if let Err(err) = write_collection(path, &records) {
        tracing::warn!(path = %path.display(), error = %err, "annotation save failed");
        return Err(err);
    }
    tracing::info!(
        path = %path.display(),
        country = %annotation.country,
        month = %annotation.month,
        year = %annotation.year,
        total = records.len(),
        "annotation saved"
    );
    Ok(path.to_path_buf())
}

/// Pretty JSON text of the current collection, as offered for download.
pub fn export_annotations(path: &Path) -> Result<String, StoreError> {
    let records = load_annotations(path);
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Serialize `records` to a sibling temp file and rename it over `path`.
///
/// A symlinked `path` is written through to its target. An existing file
/// keeps its permissions; a read-only one is refused before anything is
/// written.
fn write_collection(path: &Path, records: &[Value]) -> Result<(), StoreError> {
    let data = serde_json::to_string_pretty(records)?;
    let target = resolve_write_target(path);

    let existing = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(source) => {
            return Err(StoreError::Write {
                path: target,
                source,
            })
        }
    };
    if existing.as_ref().is_some_and(|perm| perm.readonly()) {
        return Err(StoreError::Write {
            path: target,
            source: io::Error::new(ErrorKind::PermissionDenied, "annotation file is read-only"),
        });
    }

    if let Some(parent) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp = temp_path(&target);
    if let Err(source) = write_temp(&temp, data.as_bytes(), existing) {
        let _ = fs::remove_file(&temp);
        return Err(StoreError::Write { path: temp, source });
    }
    if let Err(source) = fs::rename(&temp, &target) {
        let _ = fs::remove_file(&temp);
        return Err(StoreError::Rename {
            from: temp,
            to: target,
            source,
        });
    }
    Ok(())
}

fn write_temp(temp: &Path, data: &[u8], permissions: Option<fs::Permissions>) -> io::Result<()> {
    fs::write(temp, data)?;
    if let Some(permissions) = permissions {
        fs::set_permissions(temp, permissions)?;
    }
    Ok(())
}

/// Follow a symlink at `path`; dangling or plain paths are used as given.
fn resolve_write_target(path: &Path) -> PathBuf {
    let is_symlink = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        if let Ok(resolved) = fs::canonicalize(path) {
            return resolved;
        }
    }
    path.to_path_buf()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
