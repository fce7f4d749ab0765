// Cross-document sentence similarity.
//
// Both hit sets are vectorized over one shared bag-of-words vocabulary (with
// the English stoplist), then every sentence of set A is compared with every
// sentence of set B by cosine distance. Each A sentence keeps its closest B
// sentence when that distance is below the threshold.
//
// The full distance matrix is O(|A|·|B|) in time and space. Callers with very
// large corpora should bound the hit sets before calling in.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::keywords::{hits_for, match_keywords, Hit};
use super::vectorize::{cosine_distance, CountVectorizer};
use crate::text::stopwords::StopWords;

/// Default maximum cosine distance for two sentences to count as similar.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// A sentence from document A paired with its closest sentence in B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPair {
    pub sentence_a: String,
    pub page_a: usize,
    pub sentence_b: String,
    pub page_b: usize,
    /// Cosine distance between the two sentences (0.0 = same word counts)
    pub distance: f64,
}

/// Similar pairs found for one search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPairs {
    pub term: String,
    pub pairs: Vec<SimilarPair>,
}

/// Pairwise cosine distances; `None` where a sentence has no vocabulary terms.
///
/// Rows follow `a`, columns follow `b`. `progress` is called after every
/// computed cell with `(done, total)`.
pub fn distance_matrix(
    a: &[Vec<f64>],
    b: &[Vec<f64>],
    progress: &mut dyn FnMut(u64, u64),
) -> Vec<Vec<Option<f64>>> {
    let total = (a.len() * b.len()) as u64;
    let mut done = 0u64;

    a.iter()
        .map(|row_a| {
            b.iter()
                .map(|row_b| {
                    let d = cosine_distance(row_a, row_b);
                    done += 1;
                    progress(done, total);
                    d
                })
                .collect()
        })
        .collect()
}

/// Index and value of the smallest defined distance in a row (first wins on ties).
fn row_minimum(row: &[Option<f64>]) -> Option<(usize, f64)> {
    row.iter()
        .enumerate()
        .filter_map(|(j, d)| d.map(|d| (j, d)))
        .fold(None, |best, (j, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((j, d)),
        })
}

/// Find, for each hit in `a`, its most similar hit in `b`.
pub fn similar_sentences(a: &[Hit], b: &[Hit], threshold: f64) -> Vec<SimilarPair> {
    similar_sentences_with_progress(a, b, threshold, &mut |_, _| {})
}

/// Same as [`similar_sentences`], reporting progress through the distance matrix.
pub fn similar_sentences_with_progress(
    a: &[Hit],
    b: &[Hit],
    threshold: f64,
    progress: &mut dyn FnMut(u64, u64),
) -> Vec<SimilarPair> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }

    let sentences_a: Vec<&str> = a.iter().map(|h| h.sentence.as_str()).collect();
    let sentences_b: Vec<&str> = b.iter().map(|h| h.sentence.as_str()).collect();

    let mut vectorizer = CountVectorizer::default().with_stopwords(StopWords::english());
    let corpus: Vec<&str> = sentences_a.iter().chain(sentences_b.iter()).copied().collect();
    vectorizer.fit(&corpus);

    let features_a = vectorizer.transform(&sentences_a);
    let features_b = vectorizer.transform(&sentences_b);
    debug!(
        rows_a = features_a.len(),
        rows_b = features_b.len(),
        dimensions = vectorizer.dimensions(),
        "Vectorized sentence sets"
    );

    let matrix = distance_matrix(&features_a, &features_b, progress);

    let pairs: Vec<SimilarPair> = matrix
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let (j, distance) = row_minimum(row)?;
            (distance < threshold).then(|| SimilarPair {
                sentence_a: a[i].sentence.clone(),
                page_a: a[i].page,
                sentence_b: b[j].sentence.clone(),
                page_b: b[j].page,
                distance,
            })
        })
        .collect();

    info!(
        compared = a.len() * b.len(),
        matched = pairs.len(),
        threshold,
        "Similarity matching complete"
    );

    pairs
}

/// Compare two documents term by term.
///
/// Each term is searched in both documents; the hit sets are then matched
/// with [`similar_sentences_with_progress`]. A term missing from either
/// document yields an empty pair list.
pub fn compare_documents<S: AsRef<str>>(
    pages_a: &[String],
    pages_b: &[String],
    terms: &[S],
    threshold: f64,
    progress: &mut dyn FnMut(u64, u64),
) -> Vec<TermPairs> {
    compare_documents_with(pages_a, pages_b, terms, |a, b| {
        similar_sentences_with_progress(a, b, threshold, &mut *progress)
    })
}

/// [`compare_documents`] with the per-term matcher supplied by the caller,
/// e.g. a memoizing one.
pub fn compare_documents_with<S, F>(
    pages_a: &[String],
    pages_b: &[String],
    terms: &[S],
    mut matcher: F,
) -> Vec<TermPairs>
where
    S: AsRef<str>,
    F: FnMut(&[Hit], &[Hit]) -> Vec<SimilarPair>,
{
    let hits_a = match_keywords(pages_a, terms, None);
    let hits_b = match_keywords(pages_b, terms, None);

    hits_a
        .iter()
        .map(|term_hits| {
            let b = hits_for(&hits_b, &term_hits.term).unwrap_or(&[]);
            TermPairs {
                term: term_hits.term.clone(),
                pairs: matcher(&term_hits.hits, b),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hits(sentences: &[(&str, usize)]) -> Vec<Hit> {
        sentences
            .iter()
            .map(|(s, p)| Hit {
                sentence: s.to_string(),
                page: *p,
                section: None,
            })
            .collect()
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let a = hits(&[("the brake must hold", 1)]);
        assert!(similar_sentences(&a, &[], DEFAULT_THRESHOLD).is_empty());
        assert!(similar_sentences(&[], &a, DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_single_near_identical_pair() {
        let a = hits(&[
            ("Brake pressure must exceed limits", 3),
            ("Lighting brightness shall vary", 4),
        ]);
        let b = hits(&[
            ("Coolant temperature monitoring required", 1),
            ("brake pressure must exceed limits", 7),
        ]);

        let pairs = similar_sentences(&a, &b, DEFAULT_THRESHOLD);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].sentence_a, "Brake pressure must exceed limits");
        assert_eq!(pairs[0].page_a, 3);
        assert_eq!(pairs[0].sentence_b, "brake pressure must exceed limits");
        assert_eq!(pairs[0].page_b, 7);
        assert!(pairs[0].distance.abs() < 1e-9);
    }

    #[test]
    fn test_progress_covers_every_cell() {
        let a = hits(&[("alpha beta", 1), ("gamma delta", 1)]);
        let b = hits(&[("alpha beta", 2), ("epsilon zeta", 2), ("gamma eta", 2)]);
        let mut calls = Vec::new();
        similar_sentences_with_progress(&a, &b, DEFAULT_THRESHOLD, &mut |done, total| {
            calls.push((done, total))
        });
        assert_eq!(calls.len(), 6);
        assert_eq!(calls.last(), Some(&(6, 6)));
    }

    #[test]
    fn test_row_minimum_skips_undefined() {
        assert_eq!(row_minimum(&[None, Some(0.4), Some(0.2), Some(0.2)]), Some((2, 0.2)));
        assert_eq!(row_minimum(&[None, None]), None);
    }

    #[test]
    fn test_deterministic() {
        let a = hits(&[("vehicle speed shall be limited", 1), ("doors must lock", 2)]);
        let b = hits(&[("speed of the vehicle shall be limited", 5), ("doors must lock automatically", 6)]);
        assert_eq!(
            similar_sentences(&a, &b, DEFAULT_THRESHOLD),
            similar_sentences(&a, &b, DEFAULT_THRESHOLD)
        );
    }

    #[test]
    fn test_compare_documents_per_term() {
        let doc_a = vec!["The seat belt shall latch firmly".to_string()];
        let doc_b = vec!["seat belt shall latch firmly\nthe horn should sound".to_string()];
        let results = compare_documents(&doc_a, &doc_b, &["shall", "should"], 0.5, &mut |_, _| {});

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].term, "shall");
        assert_eq!(results[0].pairs.len(), 1);
        assert_eq!(results[1].term, "should");
        assert!(results[1].pairs.is_empty());
    }
}
