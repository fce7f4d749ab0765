// Session-held memo cache for the expensive analyses.
//
// Results are keyed by a SHA-256 hash of the inputs, so identical page sets
// and parameters hit the cache no matter where they came from. The cache
// lives in the caller's session; there is no process-wide state.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::analysis::keywords::Hit;
use crate::analysis::segment::{segment, Segmentation};
use crate::analysis::similarity::{
    compare_documents_with, similar_sentences_with_progress, SimilarPair, TermPairs,
};

/// Hash a sequence of strings. Each part is length-prefixed so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn content_key<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        let bytes = part.as_ref().as_bytes();
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    hex::encode(hasher.finalize())
}

fn hits_key(tag: &str, a: &[Hit], b: &[Hit], threshold: f64) -> String {
    let threshold = threshold.to_bits().to_string();
    let parts = std::iter::once(tag.to_string())
        .chain(std::iter::once(threshold))
        .chain(a.iter().map(|h| format!("a{}:{}", h.page, h.sentence)))
        .chain(std::iter::once(String::from("|")))
        .chain(b.iter().map(|h| format!("b{}:{}", h.page, h.sentence)));
    content_key(parts)
}

/// Memoized segmentation and similarity results.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    segmentations: HashMap<String, Segmentation>,
    similarities: HashMap<String, Vec<SimilarPair>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment `pages`, reusing an earlier result for identical content.
    pub fn segment(&mut self, pages: &[String]) -> &Segmentation {
        let key = content_key(pages);
        self.segmentations.entry(key).or_insert_with_key(|key| {
            debug!(key = %&key[..12], "Segmentation cache miss");
            segment(pages)
        })
    }

    /// Similarity matching, reusing an earlier result for identical inputs.
    ///
    /// `progress` is only called when the matrix is actually computed.
    pub fn similar_sentences(
        &mut self,
        a: &[Hit],
        b: &[Hit],
        threshold: f64,
        progress: &mut dyn FnMut(u64, u64),
    ) -> &[SimilarPair] {
        let key = hits_key("similar", a, b, threshold);
        self.similarities.entry(key).or_insert_with_key(|key| {
            debug!(key = %&key[..12], "Similarity cache miss");
            similar_sentences_with_progress(a, b, threshold, &mut *progress)
        })
    }

    /// Term-by-term document comparison with every similarity result memoized.
    pub fn compare_documents<S: AsRef<str>>(
        &mut self,
        pages_a: &[String],
        pages_b: &[String],
        terms: &[S],
        threshold: f64,
        progress: &mut dyn FnMut(u64, u64),
    ) -> Vec<TermPairs> {
        compare_documents_with(pages_a, pages_b, terms, |a, b| {
            self.similar_sentences(a, b, threshold, &mut *progress).to_vec()
        })
    }

    /// Drop the segmentation of `pages`. Similarity results are keyed by the
    /// matched sentences, not the pages, and are left in place.
    pub fn invalidate(&mut self, pages: &[String]) {
        self.segmentations.remove(&content_key(pages));
    }

    pub fn len(&self) -> usize {
        self.segmentations.len() + self.similarities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
