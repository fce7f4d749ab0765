// Colored terminal output for analysis results.
//
// This module handles all terminal-specific formatting: colors, tables and
// bar charts. The CLI display paths delegate here.

use colored::Colorize;

use crate::analysis::cooccurrence::TermCounts;
use crate::analysis::frequent::SectionWords;
use crate::analysis::headers::Header;
use crate::analysis::keywords::{Hit, TermHits};
use crate::analysis::scoring::{ScoreReport, ScoreSummary};
use crate::analysis::segment::{Segmentation, NO_SECTION};
use crate::analysis::similarity::TermPairs;

const PREVIEW_CHARS: usize = 110;

/// Page and section counts for a loaded document.
pub fn display_insights(name: &str, class: Option<&str>, pages: usize, segmentation: &Segmentation) {
    println!("\n{}", format!("=== Insights on {name} ===").bold());
    if let Some(class) = class {
        println!("  Class:      {class}");
    }
    println!("  Pages:      {pages}");
    println!("  Sections:   {}", segmentation.distinct_page_sections());
}

pub fn display_sections(segmentation: &Segmentation) {
    println!(
        "\n{}",
        format!("=== Sections ({}) ===", segmentation.sections.len()).bold()
    );
    for section in &segmentation.sections {
        let pages: Vec<String> = segmentation
            .page_sections
            .iter()
            .filter(|(_, label)| **label == section.name)
            .map(|(p, _)| p.to_string())
            .collect();
        println!(
            "  {:<50} {:>5} sentences  {}",
            super::truncate_chars(&section.name, 48).bold(),
            section.sentences.len(),
            format!("pages {}", pages.join(",")).dimmed()
        );
    }
}

pub fn display_headers(headers: &[Header]) {
    if headers.is_empty() {
        println!("No headers found.");
        return;
    }
    println!("\n{}", format!("=== Headers ({}) ===", headers.len()).bold());
    println!("  {:>5}  {}", "Page".dimmed(), "Header".dimmed());
    println!("  {}", "-".repeat(60).dimmed());
    for h in headers {
        println!("  {:>5}  {}", h.page, super::truncate_chars(&h.text, PREVIEW_CHARS));
    }
}

/// Hit counts per term followed by each term's sentences.
pub fn display_term_hits(results: &[TermHits]) {
    for result in results {
        println!(
            "\n{}",
            format!("=== {} - {} ===", title_case(&result.term), result.hits.len()).bold()
        );
        display_hits(&result.hits);
    }
}

pub fn display_hits(hits: &[Hit]) {
    if hits.is_empty() {
        println!("  {}", "no matches".dimmed());
        return;
    }
    for hit in hits {
        let section = hit
            .section
            .as_deref()
            .map(|s| format!("  [{}]", super::truncate_chars(s, 30)))
            .unwrap_or_default();
        println!(
            "  {:>4}  {}{}",
            format!("p{}", hit.page).cyan(),
            super::truncate_chars(&hit.sentence, PREVIEW_CHARS),
            section.dimmed()
        );
    }
}

/// Share of a term's hits per section, as a bar chart.
pub fn display_section_distribution(hits: &[Hit]) {
    if hits.is_empty() {
        return;
    }
    let mut counts: Vec<(String, usize)> = Vec::new();
    for hit in hits {
        // Group on the first two words of the label, e.g. "Section 3"
        let label = hit
            .section
            .as_deref()
            .unwrap_or(NO_SECTION)
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ");
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total = hits.len() as f64;
    for (label, n) in counts {
        let share = n as f64 / total;
        println!("  {:<24} {} {:>6.2}%", label, bar(share, 20), share * 100.0);
    }
}

pub fn display_counts(results: &[TermCounts], limit: usize) {
    for result in results {
        println!(
            "\n{}",
            format!("=== Associated words: {} ===", title_case(&result.term)).bold()
        );
        if result.counts.is_empty() {
            println!("  {}", "none".dimmed());
        }
        for (word, count) in result.counts.iter().take(limit) {
            println!("  {:<24} {:>5}", word, count);
        }
    }
}

pub fn display_section_words(results: &[SectionWords]) {
    for result in results {
        println!("\n{}", super::truncate_chars(&result.section, 70).bold());
        let words: Vec<String> = result
            .words
            .iter()
            .map(|(w, c)| format!("{w} ({c})"))
            .collect();
        if words.is_empty() {
            println!("  {}", "no distinctive words".dimmed());
        } else {
            println!("  {}", words.join(", "));
        }
    }
}

pub fn display_score(report: &ScoreReport, summary: Option<&ScoreSummary>) {
    if report.totals.is_empty() {
        println!("No section matched any query term.");
        return;
    }

    println!("\n{}", "=== Section Scores ===".bold());
    let max = report.totals.values().cloned().fold(0.0, f64::max);
    for (section, total) in &report.totals {
        let z = summary
            .and_then(|s| s.sections.iter().find(|(name, _, _)| name == section))
            .and_then(|(_, _, z)| *z)
            .map(|z| format!("z={z:+.2}"))
            .unwrap_or_default();
        let share = if max > 0.0 { total / max } else { 0.0 };
        println!(
            "  {:<40} {} {:>7.1}  {}",
            super::truncate_chars(section, 38),
            bar(share, 20),
            total,
            z.dimmed()
        );
    }

    if let Some(summary) = summary {
        let std = summary
            .std_dev
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!("\n  Average score: {:.2}   Std: {}", summary.mean, std);
    }

    println!("\n{}", "=== Per-term breakdown ===".bold());
    for (section, terms) in report.non_empty_breakdowns() {
        let parts: Vec<String> = terms.iter().map(|(t, w)| format!("{t}: {w}")).collect();
        println!("  {:<40} {}", super::truncate_chars(section, 38), parts.join("  ").dimmed());
    }
}

pub fn display_term_pairs(results: &[TermPairs]) {
    for result in results {
        println!(
            "\n{}",
            format!(
                "=== {} - {} similar ===",
                title_case(&result.term),
                result.pairs.len()
            )
            .bold()
        );
        if result.pairs.is_empty() {
            println!("  {}", "no similar sentences".dimmed());
        }
        for pair in &result.pairs {
            println!(
                "  {} {}",
                format!("A p{:<4}", pair.page_a).cyan(),
                super::truncate_chars(&pair.sentence_a, PREVIEW_CHARS)
            );
            println!(
                "  {} {}  {}",
                format!("B p{:<4}", pair.page_b).magenta(),
                super::truncate_chars(&pair.sentence_b, PREVIEW_CHARS),
                format!("(d={:.3})", pair.distance).dimmed()
            );
        }
    }
}

/// Fixed-width bar for a value in [0, 1], colored by size.
fn bar(share: f64, width: usize) -> colored::ColoredString {
    let filled = (share.clamp(0.0, 1.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));
    if share >= 0.5 {
        bar.bright_green()
    } else if share >= 0.2 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
