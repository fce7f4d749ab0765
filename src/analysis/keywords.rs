// Keyword matching: case-insensitive substring search over sentences.
//
// Hits keep document order (page, then line within the page) and optionally
// carry the section label of their page. Two specialised scans sit on top:
// table/figure captions and money mentions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::heuristics::{is_caption, mentions_money};
use super::segment::NO_SECTION;
use crate::text::normalize::clean_page;

/// Words scanned for by the caption search.
pub const CAPTION_WORDS: [&str; 2] = ["Table", "Figure"];

/// Default requirement terms.
pub const REQUIREMENT_TERMS: [&str; 3] = ["should", "must", "shall"];

/// One occurrence of a term in a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub sentence: String,
    /// 1-indexed page number
    pub page: usize,
    /// Section label of the page, when a section map was supplied
    pub section: Option<String>,
}

/// All hits for a single search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermHits {
    pub term: String,
    pub hits: Vec<Hit>,
}

/// Find a term's hits in a result list.
pub fn hits_for<'a>(results: &'a [TermHits], term: &str) -> Option<&'a [Hit]> {
    results
        .iter()
        .find(|r| r.term == term)
        .map(|r| r.hits.as_slice())
}

/// Normalize a user-supplied term the way matching compares it.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Collect every sentence accepted by `accept`, in document order.
fn scan<F>(
    pages: &[String],
    page_sections: Option<&BTreeMap<usize, String>>,
    mut accept: F,
) -> Vec<Hit>
where
    F: FnMut(&str) -> bool,
{
    let mut hits = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        let page_num = index + 1;
        for sentence in clean_page(page) {
            if accept(&sentence) {
                let section = page_sections.map(|map| {
                    map.get(&page_num)
                        .cloned()
                        .unwrap_or_else(|| NO_SECTION.to_string())
                });
                hits.push(Hit {
                    sentence,
                    page: page_num,
                    section,
                });
            }
        }
    }
    hits
}

/// Case-insensitive substring search for each term.
///
/// Terms are trimmed and lowercased; the returned `TermHits::term` is the
/// normalized form. Results follow the order of `terms`.
pub fn match_keywords<S: AsRef<str>>(
    pages: &[String],
    terms: &[S],
    page_sections: Option<&BTreeMap<usize, String>>,
) -> Vec<TermHits> {
    terms
        .iter()
        .map(|term| {
            let term = normalize_term(term.as_ref());
            let hits = scan(pages, page_sections, |s| s.to_lowercase().contains(&term));
            debug!(term = %term, hits = hits.len(), "Keyword scan");
            TermHits { term, hits }
        })
        .collect()
}

/// Table and figure caption lines, keyed by `"Table"` and `"Figure"`.
///
/// A caption names the item with a number (`Table 3`) and does not read like
/// a cross-reference (`see in Table 3`, `refer to Figure 2`).
pub fn match_captions(
    pages: &[String],
    page_sections: Option<&BTreeMap<usize, String>>,
) -> Vec<TermHits> {
    CAPTION_WORDS
        .iter()
        .map(|word| {
            let lower = word.to_lowercase();
            TermHits {
                term: word.to_string(),
                hits: scan(pages, page_sections, |s| is_caption(s, &lower)),
            }
        })
        .collect()
}

/// Sentences that mention money (`$`, "dollar", "money").
pub fn match_money(
    pages: &[String],
    page_sections: Option<&BTreeMap<usize, String>>,
) -> Vec<Hit> {
    scan(pages, page_sections, mentions_money)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_substring() {
        let pages = vec!["Hello World".to_string()];
        let results = match_keywords(&pages, &["hello"], None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hits.len(), 1);
        assert_eq!(results[0].hits[0].sentence, "Hello World");
        assert_eq!(results[0].hits[0].page, 1);
        assert_eq!(results[0].hits[0].section, None);
    }

    #[test]
    fn test_terms_are_normalized() {
        let pages = vec!["The driver SHALL brake".to_string()];
        let results = match_keywords(&pages, &["  Shall "], None);
        assert_eq!(results[0].term, "shall");
        assert_eq!(results[0].hits.len(), 1);
    }

    #[test]
    fn test_document_order_and_sections() {
        let pages = vec![
            "must one\nnothing\nmust two".to_string(),
            "must three".to_string(),
        ];
        let mut map = BTreeMap::new();
        map.insert(1, "Section 1 A".to_string());
        map.insert(2, "Section 2 B".to_string());

        let results = match_keywords(&pages, &["must"], Some(&map));
        let hits = hits_for(&results, "must").unwrap();
        let found: Vec<(&str, usize)> = hits.iter().map(|h| (h.sentence.as_str(), h.page)).collect();
        assert_eq!(found, vec![("must one", 1), ("must two", 1), ("must three", 2)]);
        assert_eq!(hits[2].section.as_deref(), Some("Section 2 B"));
    }

    #[test]
    fn test_captions_skip_cross_references() {
        let pages = vec!["Table 2 shows results\nrefer to Table 2\nFigure 1 Layout".to_string()];
        let results = match_captions(&pages, None);
        let tables = hits_for(&results, "Table").unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].sentence, "Table 2 shows results");
        assert_eq!(hits_for(&results, "Figure").unwrap().len(), 1);
    }

    #[test]
    fn test_money_reports_each_sentence_once() {
        let pages = vec!["$5 of money\nfree\nOne Dollar".to_string()];
        let hits = match_money(&pages, None);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].sentence, "$5 of money");
        assert_eq!(hits[1].sentence, "One Dollar");
    }
}
