// Co-occurrence counting: which words keep company with a search term.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::keywords::{match_keywords, TermHits};
use crate::text::stopwords::StopWords;

/// Frequency table of words that share sentences with a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCounts {
    pub term: String,
    /// (word, count), highest count first; ties keep first-seen order
    pub counts: Vec<(String, usize)>,
}

/// Count the non-stopword tokens that appear alongside each term.
pub fn co_occurrence<S: AsRef<str>>(
    pages: &[String],
    terms: &[S],
    stopwords: &StopWords,
) -> Vec<TermCounts> {
    match_keywords(pages, terms, None)
        .iter()
        .map(|hits| count_neighbors(hits, stopwords))
        .collect()
}

/// Tally the neighbors of one term across its hit sentences.
pub fn count_neighbors(term_hits: &TermHits, stopwords: &StopWords) -> TermCounts {
    let mut order: Vec<String> = Vec::new();
    let mut tally: HashMap<String, usize> = HashMap::new();

    for hit in &term_hits.hits {
        for token in hit.sentence.to_lowercase().split_whitespace() {
            if token == term_hits.term || stopwords.contains(token) {
                continue;
            }
            let count = tally.entry(token.to_string()).or_insert_with(|| {
                order.push(token.to_string());
                0
            });
            *count += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let n = tally[&word];
            (word, n)
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    TermCounts {
        term: term_hits.term.clone(),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_exclude_term_and_stopwords() {
        let pages = vec!["the driver must brake\nthe driver must steer\nno match".to_string()];
        let stop = StopWords::from_words(["the"]);
        let tables = co_occurrence(&pages, &["must"], &stop);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].term, "must");
        assert_eq!(
            tables[0].counts,
            vec![
                ("driver".to_string(), 2),
                ("brake".to_string(), 1),
                ("steer".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_no_hits_gives_empty_table() {
        let pages = vec!["nothing here".to_string()];
        let tables = co_occurrence(&pages, &["shall"], &StopWords::default());
        assert!(tables[0].counts.is_empty());
    }
}
