// Most frequent words per section.
//
// Each section's text is cleaned and counted over a vocabulary shared by all
// sections. Words that appear in most sections say little about any one of
// them, so terms present in more than `max_df` of the sections are dropped.

use serde::{Deserialize, Serialize};

use super::segment::segment;
use super::vectorize::CountVectorizer;
use crate::text::normalize::clean_text;

/// Words per section reported by default.
pub const DEFAULT_TOP_N: usize = 10;

/// Default document-frequency cap (fraction of sections).
pub const DEFAULT_MAX_DF: f64 = 0.8;

/// Top words of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionWords {
    pub section: String,
    /// (word, count), highest count first
    pub words: Vec<(String, usize)>,
}

/// Segment a document and report the top words of every section.
pub fn frequent_words(pages: &[String], top_n: usize, max_df: f64) -> Vec<SectionWords> {
    let segmentation = segment(pages);
    let texts: Vec<String> = segmentation
        .sections
        .iter()
        .map(|s| clean_text(&s.sentences.join(" "), None))
        .collect();

    let mut vectorizer = CountVectorizer::default().with_max_df(max_df);
    vectorizer.fit(&texts);
    let features = vectorizer.feature_names();

    segmentation
        .sections
        .iter()
        .zip(texts.iter())
        .map(|(section, text)| {
            let counts = vectorizer.transform_one(text);
            let mut words: Vec<(String, usize)> = features
                .iter()
                .zip(counts)
                .filter(|(_, c)| *c > 0.0)
                .map(|(w, c)| (w.to_string(), c as usize))
                .collect();
            words.sort_by(|a, b| b.1.cmp(&a.1));
            words.truncate(top_n);

            SectionWords {
                section: section.name.clone(),
                words,
            }
        })
        .collect()
}
