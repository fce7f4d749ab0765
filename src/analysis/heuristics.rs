// Named predicates for the structural heuristics.
//
// Every fuzzy rule (what counts as a section start, a numbered header, a
// table caption, a money mention) lives here as a small function so it can
// be tested and tuned without touching the segmentation or scoring code.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::text::normalize::is_word_char;

static NUMBERED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.*").expect("valid numbered header regex"));

/// Phrases that mark a sentence as referring to a table or figure rather
/// than being its caption ("as shown in Table 2", "refer to Figure 4").
pub const CROSS_REFERENCE_MARKERS: [&str; 4] = [" in ", " refer ", " according ", " to "];

/// Substrings that flag a sentence as talking about money.
pub const MONEY_MARKERS: [&str; 3] = ["$", "dollar", "money"];

/// Minimum character length (exclusive) for a title-style heading.
const TITLE_MIN_CHARS: usize = 6;

/// `Section 4 ...` style heading. Lines mentioning "page" are running
/// headers or footers, not section starts.
pub fn is_section_heading(line: &str) -> bool {
    line.strip_prefix("Section ")
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_numeric)
        && !line.contains("page")
}

/// Title-style heading: the first line of a page made only of a number
/// followed by words, e.g. `3 Functional Requirements` or
/// `3 Exigences générales`.
pub fn is_title_heading(line: &str, line_index: usize) -> bool {
    line_index == 0 && line.chars().count() > TITLE_MIN_CHARS && is_title_line(line)
}

/// Digits, one space, then only word characters, `+` and whitespace.
fn is_title_line(line: &str) -> bool {
    let rest = line.trim_start_matches(char::is_numeric);
    if rest.len() == line.len() {
        return false;
    }
    match rest.strip_prefix(' ') {
        Some(words) => {
            !words.is_empty()
                && words
                    .chars()
                    .all(|c| is_word_char(c) || c == '+' || c.is_whitespace())
        }
        None => false,
    }
}

/// Whether a line opens a new section during segmentation.
pub fn starts_section(line: &str, line_index: usize) -> bool {
    is_section_heading(line) || is_title_heading(line, line_index)
}

/// Loose `Section ...` check used by the header table.
pub fn is_section_header_candidate(line: &str) -> bool {
    line.starts_with("Section") && !line.contains("page")
}

/// Dotted numeric header such as `2.1 Scope` or `4.10. Limits`.
///
/// The greedy `N.N` prefix (with optional trailing dots) must not run into
/// another digit, so `1.2.3` style ids are rejected. Lines containing `...`
/// are table-of-contents entries and never count.
pub fn is_numbered_header(line: &str) -> bool {
    if line.contains("...") {
        return false;
    }
    match NUMBERED_PREFIX.find(line) {
        Some(m) => !line[m.end()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '.'),
        None => false,
    }
}

/// Leading integer of a numbered header (`"3.2 Power"` → `3`).
///
/// Returns `None` when the text before the first dot is not a number.
pub fn leading_number(header: &str) -> Option<u32> {
    header.split('.').next()?.trim().parse().ok()
}

/// Caption line for `word` (lowercase), e.g. `table 3` or `figure 12`, that
/// is not a cross-reference from narrative text.
pub fn is_caption(sentence: &str, word: &str) -> bool {
    let lower = sentence.to_lowercase();
    mentions_numbered(&lower, word)
        && CROSS_REFERENCE_MARKERS.iter().all(|m| !lower.contains(m))
}

/// `word` immediately followed by a space and a digit.
fn mentions_numbered(lower: &str, word: &str) -> bool {
    let needle = format!("{word} ");
    lower.match_indices(&needle).any(|(i, _)| {
        lower[i + needle.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    })
}

/// Sentence mentions money in any of the recognised forms.
pub fn mentions_money(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    MONEY_MARKERS.iter().any(|m| lower.contains(m))
}
