// Line-level normalization of extracted page text.
//
// A "sentence" throughout the crate is one normalized line of a page. Empty
// lines are kept so that sentence indices stay aligned with the source lines.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<.*?>").expect("valid HTML tag regex"));

/// Unicode word character: a letter, digit or underscore in any script.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Trim a line and collapse every whitespace run to a single space.
pub fn clean_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a page into its normalized sentences, one per source line.
pub fn clean_page(page: &str) -> Vec<String> {
    page.split('\n').map(clean_line).collect()
}

/// Normalize every page of a document. Index `i` holds page `i + 1`.
pub fn clean_pages(pages: &[String]) -> Vec<Vec<String>> {
    pages.iter().map(|p| clean_page(p)).collect()
}

/// Reduce free text to lowercase word tokens for counting.
///
/// Commas become spaces, HTML tags are removed, and each token is stripped
/// of non-word characters. Tokens found in `stopwords` are dropped before
/// stripping, so the stopword list should hold raw lowercase tokens.
pub fn clean_text(text: &str, stopwords: Option<&HashSet<String>>) -> String {
    let lowered = text.to_lowercase().replace(',', " ");
    let without_tags = HTML_TAG.replace_all(&lowered, "");

    let tokens: Vec<String> = without_tags
        .split_whitespace()
        .filter(|t| stopwords.is_none_or(|s| !s.contains(*t)))
        .map(|t| t.chars().filter(|c| is_word_char(*c)).collect::<String>())
        .collect();

    tokens.join(" ")
}
