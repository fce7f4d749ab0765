// Header table extraction for navigation and reporting.
//
// More permissive than segmentation: any `Section ...` line or dotted numeric
// header (`2.1 Scope`) is a candidate. A sequence pass then drops candidates
// whose leading number jumps ahead, which filters out numeric-looking text
// elsewhere in the document.
//
// Known limitation: numbering that restarts (appendices such as `A.1`, or a
// second document part starting again at `1.1`) is dropped by the sequence
// pass rather than reported.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::heuristics::{is_numbered_header, is_section_header_candidate, leading_number};
use crate::text::normalize::clean_page;

/// A structural header line and the page it occurs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// 1-indexed page number
    pub page: usize,
    pub text: String,
}

/// Extract the ordered header table of a document.
pub fn extract_headers(pages: &[String]) -> Vec<Header> {
    let candidates = pages.iter().enumerate().flat_map(|(index, page)| {
        clean_page(page)
            .into_iter()
            .filter(|line| is_section_header_candidate(line) || is_numbered_header(line))
            .map(move |text| Header {
                page: index + 1,
                text,
            })
    });

    filter_sequence(candidates)
}

/// Keep only candidates whose leading number stays put or advances by one.
///
/// Lines mentioning "section" always pass and do not move the counter.
pub fn filter_sequence<I>(candidates: I) -> Vec<Header>
where
    I: IntoIterator<Item = Header>,
{
    let mut last_num: u32 = 1;
    let mut kept = Vec::new();

    for candidate in candidates {
        let lower = candidate.text.to_lowercase();
        if lower == "section." {
            continue;
        }
        if lower.contains("section") {
            kept.push(candidate);
            continue;
        }

        let Some(num) = leading_number(&candidate.text) else {
            debug!(header = %candidate.text, "Skipping header with non-numeric prefix");
            continue;
        };

        if num == last_num {
            kept.push(candidate);
        } else if num == last_num + 1 {
            last_num = num;
            kept.push(candidate);
        } else {
            debug!(header = %candidate.text, expected = last_num, "Dropping out-of-sequence header");
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(text: &str) -> Header {
        Header {
            page: 1,
            text: text.to_string(),
        }
    }

    fn texts(headers: &[Header]) -> Vec<&str> {
        headers.iter().map(|h| h.text.as_str()).collect()
    }

    #[test]
    fn test_sequence_skips_jump_but_accepts_next() {
        let kept = filter_sequence(vec![
            header("1.1 Purpose"),
            header("1.2 Scope"),
            header("5.1 Stray number"),
            header("2.1 Power"),
        ]);
        assert_eq!(texts(&kept), vec!["1.1 Purpose", "1.2 Scope", "2.1 Power"]);
    }

    #[test]
    fn test_section_lines_always_pass() {
        let kept = filter_sequence(vec![
            header("Section 9 Appendix"),
            header("Section."),
            header("7.1 Jump"),
        ]);
        assert_eq!(texts(&kept), vec!["Section 9 Appendix"]);
    }

    #[test]
    fn test_non_numeric_prefix_is_skipped() {
        let kept = filter_sequence(vec![header("x1.1 odd"), header("1.1 Fine")]);
        assert_eq!(texts(&kept), vec!["1.1 Fine"]);
    }

    #[test]
    fn test_extract_headers_records_pages_and_skips_toc() {
        let pages = vec![
            "Contents\n1.1 Purpose ....... 3\n2.1 Power ....... 5".to_string(),
            "1.1 Purpose\nThe purpose is simple.".to_string(),
            "Section 2 on page 9\n2.1 Power\nbody".to_string(),
        ];
        let headers = extract_headers(&pages);
        assert_eq!(
            headers,
            vec![
                Header { page: 2, text: "1.1 Purpose".to_string() },
                Header { page: 3, text: "2.1 Power".to_string() },
            ]
        );
    }
}
