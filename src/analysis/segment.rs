// Section segmentation: partitions a document's pages into named sections.
//
// Pages are walked in order. The first line on a page that looks like a
// section start (see `heuristics::starts_section`) closes the open section
// and opens a new one named after that line. Every sentence of every page
// lands in exactly one section, and every page maps to exactly one label.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::heuristics::starts_section;
use crate::text::normalize::clean_page;

/// Label for pages that come before the first detected section header.
pub const NO_SECTION: &str = "No Section";

/// A named, contiguous span of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// The header line that opened this section
    pub name: String,
    /// Normalized sentences, in document order
    pub sentences: Vec<String>,
}

/// Result of segmenting a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Sections in the order they first appear
    pub sections: Vec<Section>,
    /// 1-indexed page number → section label
    pub page_sections: BTreeMap<usize, String>,
}

impl Segmentation {
    /// Look up a section by its label.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Number of distinct section labels assigned to pages.
    pub fn distinct_page_sections(&self) -> usize {
        let mut labels: Vec<&String> = self.page_sections.values().collect();
        labels.sort();
        labels.dedup();
        labels.len()
    }

    /// Append a closed section. A label seen before is merged into the
    /// earlier entry so repeated header text never drops content.
    fn flush(&mut self, name: String, sentences: Vec<String>) {
        if let Some(existing) = self.sections.iter_mut().find(|s| s.name == name) {
            existing.sentences.extend(sentences);
        } else {
            self.sections.push(Section { name, sentences });
        }
    }
}

/// Split a document's pages into sections.
pub fn segment(pages: &[String]) -> Segmentation {
    let mut out = Segmentation::default();
    let mut open_name: Option<String> = None;
    let mut open_sentences: Vec<String> = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        let page_num = index + 1;
        let sentences = clean_page(page);

        if let Some(header) = sentences
            .iter()
            .enumerate()
            .find(|(i, line)| starts_section(line, *i))
            .map(|(_, line)| line.clone())
        {
            let previous = open_name.take().unwrap_or_else(|| NO_SECTION.to_string());
            let closed = std::mem::take(&mut open_sentences);
            if !closed.is_empty() || previous != NO_SECTION {
                out.flush(previous, closed);
            }
            debug!(page = page_num, header = %header, "Section start");
            open_name = Some(header);
        }

        let label = open_name.clone().unwrap_or_else(|| NO_SECTION.to_string());
        out.page_sections.insert(page_num, label);
        open_sentences.extend(sentences);
    }

    if !pages.is_empty() {
        let last = open_name.unwrap_or_else(|| NO_SECTION.to_string());
        out.flush(last, open_sentences);
    }

    out
}
