use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

/// Saved documents and their class grouping.
#[derive(Debug, Default)]
pub struct History {
    documents_path: PathBuf,
    classes_path: PathBuf,
    documents: BTreeMap<String, Vec<String>>,
    classes: BTreeMap<String, Vec<String>>,
}

fn read_map<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!(path = %path.display(), "History file absent, starting empty");
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Malformed JSON in {}", path.display()))
}

fn write_map<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

impl History {
    /// Load both history files. Missing files mean an empty history.
    pub fn open(documents_path: &Path, classes_path: &Path) -> Result<Self> {
        let documents = read_map(documents_path)?;
        let classes = read_map(classes_path)?;
        Ok(Self {
            documents_path: documents_path.to_path_buf(),
            classes_path: classes_path.to_path_buf(),
            documents,
            classes,
        })
    }

    /// Record a document's pages under `name` and file it under `class`.
    ///
    /// Re-remembering a name replaces its pages; the class list never holds
    /// the same name twice.
    pub fn remember(&mut self, name: &str, class: &str, pages: Vec<String>) {
        self.documents.insert(name.to_string(), pages);
        let members = self.classes.entry(class.to_string()).or_default();
        if !members.iter().any(|m| m == name) {
            members.push(name.to_string());
        }
    }

    pub fn pages(&self, name: &str) -> Option<&[String]> {
        self.documents.get(name).map(Vec::as_slice)
    }

    /// Class names with the number of files in each.
    pub fn class_counts(&self) -> Vec<(&str, usize)> {
        self.classes
            .iter()
            .map(|(class, files)| (class.as_str(), files.len()))
            .collect()
    }

    /// Files filed under a class, sorted.
    pub fn files_in(&self, class: &str) -> Vec<&str> {
        let mut files: Vec<&str> = self
            .classes
            .get(class)
            .map(|f| f.iter().map(String::as_str).collect())
            .unwrap_or_default();
        files.sort_unstable();
        files
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Overwrite both files with the current state.
    pub fn save(&self) -> Result<()> {
        write_map(&self.documents_path, &self.documents)?;
        write_map(&self.classes_path, &self.classes)?;
        info!(
            documents = self.documents.len(),
            classes = self.classes.len(),
            "History saved"
        );
        Ok(())
    }
}
