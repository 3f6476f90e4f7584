//! Shared mock backend for CLI unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use annot_core::config::{Config, StorageMode};
use annot_core::session::Upload;
use chrono::NaiveDate;

use crate::AnnotBackend;

pub struct MockAnnotBackend {
    pub root: PathBuf,
    pub mode: StorageMode,
    pub annotator: Option<String>,
    pub today: NaiveDate,
    pub files: HashMap<String, Vec<u8>>,
    pub input: RefCell<VecDeque<String>>,
    pub emitted: RefCell<String>,
}

impl MockAnnotBackend {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/nonexistent"),
            mode: StorageMode::Shared,
            annotator: None,
            today: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default(),
            files: HashMap::new(),
            input: RefCell::new(VecDeque::new()),
            emitted: RefCell::new(String::new()),
        }
    }

    pub fn with_root(mut self, root: &Path) -> Self {
        self.root = root.to_path_buf();
        self
    }

    pub fn with_annotator(mut self, name: &str) -> Self {
        self.annotator = Some(name.to_string());
        self
    }

    pub fn with_file(mut self, path: &str, bytes: &[u8]) -> Self {
        self.files.insert(path.to_string(), bytes.to_vec());
        self
    }

    pub fn with_input(self, lines: &[&str]) -> Self {
        self.input
            .borrow_mut()
            .extend(lines.iter().map(|l| (*l).to_string()));
        self
    }
}

impl AnnotBackend for MockAnnotBackend {
    fn config(&self) -> Result<Config, String> {
        Ok(Config {
            root: self.root.clone(),
            mode: self.mode,
            annotator: self.annotator.clone(),
        })
    }

    fn today(&self) -> NaiveDate {
        self.today
    }

    fn read_upload(&self, path: &str) -> Result<Upload, String> {
        let bytes = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("read report {path}: not found"))?;
        let filename = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Upload { filename, bytes })
    }

    fn read_file(&self, path: &str) -> Result<String, String> {
        self.files
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .ok_or_else(|| "read file: not found".to_string())
    }

    fn read_line(&self) -> Option<String> {
        self.input.borrow_mut().pop_front()
    }

    fn emit(&self, text: &str) {
        self.emitted.borrow_mut().push_str(text);
    }
}
