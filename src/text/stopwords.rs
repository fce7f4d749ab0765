// Stopword sets used by co-occurrence counting and the bag-of-words
// vectorizer.
//
// The built-in English list comes from the `stop-words` crate. A custom list
// can be supplied as a JSON array of strings and is loaded once at start-up.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};
use tracing::info;

/// An immutable set of lowercase tokens to ignore.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The English list shipped with the `stop-words` crate.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words)
    }

    /// Build a set from arbitrary tokens. Tokens are lowercased and trimmed.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a JSON array of strings, e.g. `["the", "and", "of"]`.
    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stopword file {}", path.display()))?;
        let words: Vec<String> = serde_json::from_str(&raw)
            .with_context(|| format!("Stopword file {} is not a JSON string array", path.display()))?;
        info!(path = %path.display(), count = words.len(), "Loaded custom stopwords");
        Ok(Self::from_words(words))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_contains_common_words() {
        let stop = StopWords::english();
        assert!(stop.contains("the"));
        assert!(stop.contains("and"));
        assert!(!stop.contains("brake"));
    }

    #[test]
    fn test_from_words_normalizes() {
        let stop = StopWords::from_words(["  The ", "AND", ""]);
        assert_eq!(stop.len(), 2);
        assert!(stop.contains("the"));
        assert!(stop.contains("and"));
    }

    #[test]
    fn test_load_json_roundtrip_file() {
        let path = std::env::temp_dir().join(format!("docsift-stop-{}.json", std::process::id()));
        std::fs::write(&path, r#"["vehicle", "system"]"#).unwrap();
        let stop = StopWords::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(stop.contains("vehicle"));
        assert!(stop.contains("system"));
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let path =
            std::env::temp_dir().join(format!("docsift-stop-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        let result = StopWords::load_json(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
