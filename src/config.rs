use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::similarity::DEFAULT_THRESHOLD;
use crate::text::stopwords::StopWords;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every value
/// has a default, so an empty environment is a valid configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the history files
    pub data_dir: PathBuf,
    /// filename → pages history (DOCSIFT_HISTORY_PATH)
    pub history_path: PathBuf,
    /// class → filenames history (DOCSIFT_CLASS_PATH)
    pub class_path: PathBuf,
    /// Optional JSON array of stopwords for co-occurrence counting
    pub stopwords_path: Option<PathBuf>,
    /// Maximum cosine distance for similar sentences
    pub similarity_threshold: f64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let data_dir = env::var("DOCSIFT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let history_path = env::var("DOCSIFT_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("db.json"));
        let class_path = env::var("DOCSIFT_CLASS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("class.json"));

        let similarity_threshold = match env::var("DOCSIFT_SIMILARITY_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        Ok(Self {
            data_dir,
            history_path,
            class_path,
            stopwords_path: env::var("DOCSIFT_STOPWORDS_PATH").ok().map(PathBuf::from),
            similarity_threshold,
        })
    }

    /// Stopwords for co-occurrence counting: the configured file, or the
    /// built-in English list.
    pub fn stopwords(&self) -> Result<StopWords> {
        match &self.stopwords_path {
            Some(path) => StopWords::load_json(path),
            None => Ok(StopWords::english()),
        }
    }
}

/// Platform data directory, falling back to `./.docsift`.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("docsift"))
        .unwrap_or_else(|| PathBuf::from(".docsift"))
}

/// A cosine distance threshold must lie in (0, 2].
pub fn parse_threshold(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("DOCSIFT_SIMILARITY_THRESHOLD is not a number: {raw:?}"))?;
    check_threshold(value)
}

/// Reject thresholds outside (0, 2], the range of cosine distance.
pub fn check_threshold(value: f64) -> Result<f64> {
    if !(value > 0.0 && value <= 2.0) {
        anyhow::bail!("Similarity threshold must be in (0, 2], got {value}");
    }
    Ok(value)
}
