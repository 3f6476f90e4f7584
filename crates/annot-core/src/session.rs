//! Per-interaction annotation session.
//!
//! Holds the annotator name, the resolved annotation file and the records
//! submitted during this interaction. One upload is active at a time.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;

use crate::annotation::Annotation;
use crate::config::{Config, StorageMode};
use crate::constants::SHARED_ANNOTATIONS_FILE;
use crate::error::SessionError;
use crate::metadata::{extract_pdf_metadata, FilenameMetadata};
use crate::names::annotations_filename;
use crate::store::{load_annotations, save_annotation};

/// An uploaded report: original file name plus opaque contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    /// The last upload's name did not parse; nothing can be submitted for it.
    NoMetadata { filename: String },
    AwaitingSubmission { metadata: FilenameMetadata },
    Submitted {
        metadata: FilenameMetadata,
        path: PathBuf,
    },
}

#[derive(Debug)]
pub struct Session {
    root: PathBuf,
    mode: StorageMode,
    annotator: String,
    annotations_file: Option<PathBuf>,
    upload: Option<Upload>,
    state: SubmissionState,
    submitted: Vec<Annotation>,
}

impl Session {
    pub fn new(root: &Path, mode: StorageMode) -> Self {
        Self {
            root: root.to_path_buf(),
            mode,
            annotator: String::new(),
            annotations_file: None,
            upload: None,
            state: SubmissionState::Idle,
            submitted: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new(&config.root, config.mode);
        if let Some(name) = &config.annotator {
            session.set_annotator(name);
        }
        session
    }

    pub fn annotator(&self) -> &str {
        &self.annotator
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Set the annotator name. A different name drops the cached file target.
    pub fn set_annotator(&mut self, name: &str) {
        let trimmed = name.trim();
        if trimmed != self.annotator {
            self.annotator = trimmed.to_string();
            self.annotations_file = None;
        }
    }

    /// Annotation file for this session.
    ///
    /// In per-annotator mode the name is derived from the annotator and
    /// `today` on first call and reused for the rest of the session.
    pub fn annotations_path(&mut self, today: NaiveDate) -> Result<PathBuf, SessionError> {
        if self.annotator.is_empty() {
            return Err(SessionError::MissingAnnotator);
        }
        if let Some(path) = &self.annotations_file {
            return Ok(path.clone());
        }
        let path = match self.mode {
            StorageMode::Shared => self.root.join(SHARED_ANNOTATIONS_FILE),
            StorageMode::PerAnnotator => self
                .root
                .join(annotations_filename(&self.annotator, today)),
        };
        self.annotations_file = Some(path.clone());
        Ok(path)
    }

    /// Accept a new upload and extract its metadata.
    ///
    /// Replaces any previous upload. On an unparseable name the session moves
    /// to [`SubmissionState::NoMetadata`] and submission stays blocked until
    /// the next successful upload.
    pub fn upload(&mut self, upload: Upload) -> Result<FilenameMetadata, SessionError> {
        if self.annotator.is_empty() {
            return Err(SessionError::MissingAnnotator);
        }
        match extract_pdf_metadata(&upload.filename) {
            Some(metadata) => {
                tracing::debug!(
                    filename = %upload.filename,
                    bytes = upload.bytes.len(),
                    "report loaded"
                );
                self.upload = Some(upload);
                self.state = SubmissionState::AwaitingSubmission {
                    metadata: metadata.clone(),
                };
                Ok(metadata)
            }
            None => {
                let filename = upload.filename;
                self.upload = None;
                self.state = SubmissionState::NoMetadata {
                    filename: filename.clone(),
                };
                Err(SessionError::UnparseableFilename { filename })
            }
        }
    }

    /// Submit a summary for the current upload.
    ///
    /// Blank summaries are rejected before the store is touched. On a store
    /// failure the upload stays loaded so the same summary can be retried.
    pub fn submit(&mut self, summary: &str, today: NaiveDate) -> Result<PathBuf, SessionError> {
        let metadata = match &self.state {
            SubmissionState::AwaitingSubmission { metadata }
            | SubmissionState::Submitted { metadata, .. } => metadata.clone(),
            SubmissionState::Idle | SubmissionState::NoMetadata { .. } => {
                return Err(SessionError::NoUpload)
            }
        };
        if summary.trim().is_empty() {
            return Err(SessionError::EmptySummary);
        }
        let path = self.annotations_path(today)?;
        let annotation = Annotation::new(&self.annotator, &metadata, summary);

        match save_annotation(&path, &annotation) {
            Ok(written) => {
                self.submitted.push(annotation);
                self.state = SubmissionState::Submitted {
                    metadata,
                    path: written.clone(),
                };
                Ok(written)
            }
            Err(err) => {
                self.state = SubmissionState::AwaitingSubmission { metadata };
                Err(err.into())
            }
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn current_upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    /// Records submitted during this session, in submission order.
    pub fn session_annotations(&self) -> &[Annotation] {
        &self.submitted
    }

    /// Everything currently stored in this session's annotation file.
    pub fn stored_annotations(&mut self, today: NaiveDate) -> Result<Vec<Value>, SessionError> {
        let path = self.annotations_path(today)?;
        Ok(load_annotations(&path))
    }
}
