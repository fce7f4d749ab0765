// CSV rendering of result tables.
//
// Every analysis result converts into a `Table`; the CLI writes it out when
// the user passes `--csv`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::cooccurrence::TermCounts;
use crate::analysis::frequent::SectionWords;
use crate::analysis::headers::Header;
use crate::analysis::keywords::{Hit, TermHits};
use crate::analysis::scoring::{ScoreReport, ScoreSummary};
use crate::analysis::segment::Segmentation;
use crate::analysis::similarity::{SimilarPair, TermPairs};

/// A header row plus data rows, all as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Render as RFC 4180 style CSV with `\n` line endings.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_record(&mut out, &self.columns);
        for row in &self.rows {
            write_record(&mut out, row);
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv())
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), rows = self.rows.len(), "CSV written");
        Ok(())
    }
}

/// Path for a secondary table written next to `path`
/// (`report.csv` + `words` → `report.words.csv`).
pub fn companion_path(path: &Path, kind: &str) -> PathBuf {
    path.with_extension(format!("{kind}.csv"))
}

fn write_record(out: &mut String, fields: &[String]) {
    let escaped: Vec<String> = fields.iter().map(|f| escape(f)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// Quote a field when it holds a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn hits_table(hits: &[Hit]) -> Table {
    let with_section = hits.iter().any(|h| h.section.is_some());
    let mut table = if with_section {
        Table::new(&["Sentence", "Page", "Section"])
    } else {
        Table::new(&["Sentence", "Page"])
    };
    for hit in hits {
        let mut row = vec![hit.sentence.clone(), hit.page.to_string()];
        if with_section {
            row.push(hit.section.clone().unwrap_or_default());
        }
        table.push(row);
    }
    table
}

/// All terms' hits in one table, with the term as the first column.
pub fn term_hits_table(results: &[TermHits]) -> Table {
    let mut table = Table::new(&["Term", "Sentence", "Page", "Section"]);
    for result in results {
        for hit in &result.hits {
            table.push(vec![
                result.term.clone(),
                hit.sentence.clone(),
                hit.page.to_string(),
                hit.section.clone().unwrap_or_default(),
            ]);
        }
    }
    table
}

pub fn headers_table(headers: &[Header]) -> Table {
    let mut table = Table::new(&["Page Number", "Header"]);
    for h in headers {
        table.push(vec![h.page.to_string(), h.text.clone()]);
    }
    table
}

pub fn sections_table(segmentation: &Segmentation) -> Table {
    let mut table = Table::new(&["Page", "Section"]);
    for (page, section) in &segmentation.page_sections {
        table.push(vec![page.to_string(), section.clone()]);
    }
    table
}

pub fn counts_table(results: &[TermCounts]) -> Table {
    let mut table = Table::new(&["Term", "Word", "Count"]);
    for result in results {
        for (word, count) in &result.counts {
            table.push(vec![result.term.clone(), word.clone(), count.to_string()]);
        }
    }
    table
}

pub fn pairs_table(pairs: &[SimilarPair]) -> Table {
    let mut table = Table::new(&[
        "File 1 Sentence",
        "File 1 Page",
        "File 2 Sentence",
        "File 2 Page",
        "Distance",
    ]);
    for p in pairs {
        table.push(vec![
            p.sentence_a.clone(),
            p.page_a.to_string(),
            p.sentence_b.clone(),
            p.page_b.to_string(),
            format!("{:.4}", p.distance),
        ]);
    }
    table
}

pub fn term_pairs_table(results: &[TermPairs]) -> Table {
    let mut table = Table::new(&["Term"]);
    table.columns.extend(pairs_table(&[]).columns);
    for result in results {
        for row in pairs_table(&result.pairs).rows {
            let mut full = vec![result.term.clone()];
            full.extend(row);
            table.push(full);
        }
    }
    table
}

pub fn score_table(report: &ScoreReport, summary: Option<&ScoreSummary>) -> Table {
    let mut table = Table::new(&["Section Title", "Weight", "Z-Score"]);
    for (section, total) in &report.totals {
        let z = summary
            .and_then(|s| s.sections.iter().find(|(name, _, _)| name == section))
            .and_then(|(_, _, z)| *z)
            .map(|z| format!("{z:.4}"))
            .unwrap_or_default();
        table.push(vec![section.clone(), format_weight(*total), z]);
    }
    table
}

pub fn score_breakdown_table(report: &ScoreReport) -> Table {
    let mut table = Table::new(&["Section Title", "Term", "Weight"]);
    for (section, terms) in report.non_empty_breakdowns() {
        for (term, weight) in terms {
            table.push(vec![section.clone(), term.clone(), format_weight(*weight)]);
        }
    }
    table
}

pub fn section_words_table(results: &[SectionWords]) -> Table {
    let mut table = Table::new(&["Section", "Word", "Count"]);
    for result in results {
        for (word, count) in &result.words {
            table.push(vec![result.section.clone(), word.clone(), count.to_string()]);
        }
    }
    table
}

/// Whole weights print without a fractional part.
fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{weight:.0}")
    } else {
        format!("{weight}")
    }
}
