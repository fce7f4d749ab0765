// Bag-of-words count vectorizer.
//
// Tokens are lowercase runs of two or more word characters. The vocabulary
// is sorted alphabetically so that vectors are stable across runs, and every
// document transformed by one vectorizer shares the same dimensions.

use std::collections::{BTreeMap, BTreeSet};

use crate::text::normalize::is_word_char;
use crate::text::stopwords::StopWords;

/// Split text into lowercase word tokens of at least two characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Count vectorizer with an optional stoplist and document-frequency cap.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    stopwords: Option<StopWords>,
    /// Drop terms present in more than this fraction of documents
    max_df: f64,
    vocabulary: BTreeMap<String, usize>,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self {
            stopwords: None,
            max_df: 1.0,
            vocabulary: BTreeMap::new(),
        }
    }
}

impl CountVectorizer {
    pub fn with_stopwords(mut self, stopwords: StopWords) -> Self {
        self.stopwords = Some(stopwords);
        self
    }

    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    fn terms(&self, doc: &str) -> Vec<String> {
        let tokens = tokenize(doc);
        match &self.stopwords {
            Some(stop) => tokens.into_iter().filter(|t| !stop.contains(t)).collect(),
            None => tokens,
        }
    }

    /// Learn the vocabulary from a set of documents.
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> &mut Self {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in docs {
            let unique: BTreeSet<String> = self.terms(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let max_docs = self.max_df * docs.len() as f64;
        self.vocabulary = doc_freq
            .into_iter()
            .filter(|(_, df)| *df as f64 <= max_docs)
            .map(|(term, _)| term)
            .enumerate()
            .map(|(i, term)| (term, i))
            .collect();
        self
    }

    /// Term counts of one document over the fitted vocabulary.
    pub fn transform_one(&self, doc: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for term in self.terms(doc) {
            if let Some(&i) = self.vocabulary.get(&term) {
                row[i] += 1.0;
            }
        }
        row
    }

    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> Vec<Vec<f64>> {
        docs.iter().map(|d| self.transform_one(d.as_ref())).collect()
    }

    /// Vocabulary terms in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        // BTreeMap iteration is alphabetical, which is also column order
        self.vocabulary.keys().map(String::as_str).collect()
    }

    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Cosine distance `1 - cos(a, b)`.
///
/// Returns `None` when either vector has zero magnitude, where the distance
/// is undefined. Rounding error is clamped into `[0, 2]`.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        None
    } else {
        Some((1.0 - dot / denom).clamp(0.0, 2.0))
    }
}
