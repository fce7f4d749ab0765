// Weighted query scoring: how strongly each section matches a set of
// weighted terms.
//
// Every sentence containing a term (case-insensitive substring) adds the
// term's weight to its section. A sentence containing two terms counts for
// both.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::segment::NO_SECTION;
use crate::text::normalize::clean_page;

/// Section totals and per-term breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Section → summed weight. Sections without any hit are absent.
    pub totals: BTreeMap<String, f64>,
    /// Section → term → summed weight. Every section of the document has an
    /// entry, empty when nothing matched.
    pub by_term: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Spread of section totals, used to compare sections against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two scored sections
    pub std_dev: Option<f64>,
    /// (section, total, z-score) in section order
    pub sections: Vec<(String, f64, Option<f64>)>,
}

/// Score every section of a document against weighted terms.
pub fn weighted_score<S: AsRef<str>>(
    pages: &[String],
    page_sections: &BTreeMap<usize, String>,
    weighted_terms: &[(S, f64)],
) -> ScoreReport {
    let terms: Vec<(String, String, f64)> = weighted_terms
        .iter()
        .map(|(t, w)| (t.as_ref().to_string(), t.as_ref().to_lowercase(), *w))
        .collect();

    let mut report = ScoreReport::default();

    for (index, page) in pages.iter().enumerate() {
        let section = page_sections
            .get(&(index + 1))
            .cloned()
            .unwrap_or_else(|| NO_SECTION.to_string());
        report.by_term.entry(section.clone()).or_default();

        for sentence in clean_page(page) {
            let lower = sentence.to_lowercase();
            for (term, needle, weight) in &terms {
                if !lower.contains(needle.as_str()) {
                    continue;
                }
                *report
                    .by_term
                    .entry(section.clone())
                    .or_default()
                    .entry(term.clone())
                    .or_insert(0.0) += weight;
                *report.totals.entry(section.clone()).or_insert(0.0) += weight;
            }
        }
    }

    debug!(
        sections = report.by_term.len(),
        scored = report.totals.len(),
        "Weighted scoring complete"
    );

    report
}

impl ScoreReport {
    /// Per-term breakdown for sections that matched at least one term.
    pub fn non_empty_breakdowns(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, f64>)> {
        self.by_term.iter().filter(|(_, terms)| !terms.is_empty())
    }

    /// Mean, standard deviation and z-score of the section totals.
    pub fn summary(&self) -> Option<ScoreSummary> {
        if self.totals.is_empty() {
            return None;
        }

        let n = self.totals.len() as f64;
        let mean = self.totals.values().sum::<f64>() / n;
        let std_dev = if self.totals.len() < 2 {
            None
        } else {
            let var = self
                .totals
                .values()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            Some(var.sqrt())
        };

        let sections = self
            .totals
            .iter()
            .map(|(name, total)| {
                let z = std_dev
                    .filter(|sd| *sd > f64::EPSILON)
                    .map(|sd| (total - mean) / sd);
                (name.clone(), *total, z)
            })
            .collect();

        Some(ScoreSummary {
            mean,
            std_dev,
            sections,
        })
    }
}
