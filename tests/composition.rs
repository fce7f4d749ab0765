// Composition tests: verifying that the pieces chain together correctly.
//
// These tests exercise the data flow between modules:
//   page provider -> segmentation -> keyword / scoring / similarity -> CSV
// plus the history store round trip. Files are written under the system
// temp directory and removed afterwards.

use std::path::PathBuf;

use docsift::analysis::keywords::{match_keywords, REQUIREMENT_TERMS};
use docsift::analysis::scoring::weighted_score;
use docsift::analysis::similarity::{compare_documents, DEFAULT_THRESHOLD};
use docsift::cache::AnalysisCache;
use docsift::analysis::cooccurrence::co_occurrence;
use docsift::output::csv::{companion_path, counts_table, pairs_table, score_table, term_hits_table};
use docsift::pages::load_pages;
use docsift::store::History;
use docsift::text::stopwords::StopWords;

fn temp_file(tag: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("docsift-{tag}-{}.txt", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

const SPEC_A: &str = "Vehicle Brake Specification\nDraft\u{c}\
Section 1 General\nThe brake pedal must return to rest.\nLamps should be visible.\u{c}\
Section 2 Electrical\nThe harness shall resist water.\nFuses must be labelled.\u{c}";

const SPEC_B: &str = "Section 1 Overview\nThe brake pedal must return to rest position.\u{c}\
Section 2 Wiring\nConnectors shall be sealed.\u{c}";

// ============================================================
// Chain: text file -> pages -> segmentation -> scoring -> CSV
// ============================================================

#[test]
fn text_file_to_section_scores() {
    let path = temp_file("chain", SPEC_A);
    let pages = load_pages(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(pages.len(), 3);

    let mut cache = AnalysisCache::new();
    let page_sections = cache.segment(&pages).page_sections.clone();
    assert_eq!(page_sections[&2], "Section 1 General");
    assert_eq!(page_sections[&3], "Section 2 Electrical");

    let report = weighted_score(&pages, &page_sections, &[("must", 3.0), ("shall", 2.0), ("should", 1.0)]);
    assert_eq!(report.totals["Section 1 General"], 4.0);
    assert_eq!(report.totals["Section 2 Electrical"], 5.0);
    assert!(report.by_term["No Section"].is_empty());

    let summary = report.summary().unwrap();
    let csv = score_table(&report, Some(&summary)).to_csv();
    assert!(csv.starts_with("Section Title,Weight,Z-Score\n"));
    assert!(csv.contains("Section 2 Electrical,5,"));
}

#[test]
fn requirement_hits_carry_sections_into_csv() {
    let path = temp_file("requirements", SPEC_A);
    let pages = load_pages(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let mut cache = AnalysisCache::new();
    let page_sections = cache.segment(&pages).page_sections.clone();
    let results = match_keywords(&pages, &REQUIREMENT_TERMS, Some(&page_sections));

    let counts: Vec<(&str, usize)> = results
        .iter()
        .map(|r| (r.term.as_str(), r.hits.len()))
        .collect();
    assert_eq!(counts, vec![("should", 1), ("must", 2), ("shall", 1)]);

    let csv = term_hits_table(&results).to_csv();
    assert!(csv.contains("must,Fuses must be labelled.,3,Section 2 Electrical\n"));
}

#[test]
fn requirement_words_written_beside_hits_csv() {
    let pages = docsift::pages::split_pages(SPEC_A);
    let associated = co_occurrence(&pages, &REQUIREMENT_TERMS, &StopWords::english());

    let dir = std::env::temp_dir().join(format!("docsift-words-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let hits_csv = dir.join("requirements.csv");
    let words_csv = companion_path(&hits_csv, "words");
    counts_table(&associated).write(&words_csv).unwrap();
    let written = std::fs::read_to_string(&words_csv).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(words_csv.file_name().unwrap(), "requirements.words.csv");
    assert!(written.starts_with("Term,Word,Count\n"));
    assert!(written.contains("must,fuses,1\n"));
    assert!(written.contains("shall,harness,1\n"));
}

// ============================================================
// Chain: workbook -> pages -> segmentation -> search
// ============================================================

#[test]
fn workbook_rows_feed_segmentation() {
    use std::io::Write;

    let sheet = r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>Id</t></is></c><c r="B1" t="inlineStr"><is><t>Text</t></is></c></row>
<row r="2"><c r="A2"><v>1</v></c><c r="B2" t="inlineStr"><is><t>Section 1 Scope
The pump shall start.</t></is></c></row>
<row r="3"><c r="A3"><v>2</v></c><c r="B3" t="inlineStr"><is><t>Section 2 Limits
Pressure must stay low.</t></is></c></row>
</sheetData></worksheet>"#;

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file("xl/worksheets/sheet1.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(sheet.as_bytes()).unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let path = std::env::temp_dir().join(format!("docsift-workbook-{}.xlsm", std::process::id()));
    std::fs::write(&path, bytes).unwrap();
    let pages = load_pages(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(pages.len(), 2);
    let mut cache = AnalysisCache::new();
    let page_sections = cache.segment(&pages).page_sections.clone();
    assert_eq!(page_sections[&1], "Section 1 Scope");
    assert_eq!(page_sections[&2], "Section 2 Limits");

    let results = match_keywords(&pages, &["must"], Some(&page_sections));
    assert_eq!(results[0].hits[0].section.as_deref(), Some("Section 2 Limits"));
}

// ============================================================
// Chain: two documents -> compare -> CSV
// ============================================================

#[test]
fn compare_two_documents() {
    let path_a = temp_file("cmp-a", SPEC_A);
    let path_b = temp_file("cmp-b", SPEC_B);
    let pages_a = load_pages(&path_a).unwrap();
    let pages_b = load_pages(&path_b).unwrap();
    std::fs::remove_file(&path_a).ok();
    std::fs::remove_file(&path_b).ok();

    let results = compare_documents(&pages_a, &pages_b, &["must"], DEFAULT_THRESHOLD, &mut |_, _| {});
    assert_eq!(results.len(), 1);

    let pairs = &results[0].pairs;
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].sentence_a, "The brake pedal must return to rest.");
    assert_eq!(pairs[0].page_a, 2);
    assert_eq!(pairs[0].page_b, 1);

    let table = pairs_table(pairs);
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][3], "1");
}

#[test]
fn cached_similarity_matches_direct_call() {
    let pages_a = docsift::pages::split_pages(SPEC_A);
    let pages_b = docsift::pages::split_pages(SPEC_B);
    let hits_a = match_keywords(&pages_a, &["shall"], None);
    let hits_b = match_keywords(&pages_b, &["shall"], None);

    let direct = docsift::analysis::similarity::similar_sentences(
        &hits_a[0].hits,
        &hits_b[0].hits,
        DEFAULT_THRESHOLD,
    );
    let mut cache = AnalysisCache::new();
    let cached = cache
        .similar_sentences(&hits_a[0].hits, &hits_b[0].hits, DEFAULT_THRESHOLD, &mut |_, _| {})
        .to_vec();
    assert_eq!(direct, cached);
}

#[test]
fn cached_comparison_matches_library_comparison() {
    let pages_a = docsift::pages::split_pages(SPEC_A);
    let pages_b = docsift::pages::split_pages(SPEC_B);
    let terms = ["must", "shall"];

    let direct = compare_documents(&pages_a, &pages_b, &terms, DEFAULT_THRESHOLD, &mut |_, _| {});
    let mut cache = AnalysisCache::new();
    let cached = cache.compare_documents(&pages_a, &pages_b, &terms, DEFAULT_THRESHOLD, &mut |_, _| {});
    assert_eq!(direct, cached);
    assert_eq!(cached[0].pairs.len(), 1);
}

// ============================================================
// History store
// ============================================================

#[test]
fn history_round_trip_feeds_analysis() {
    let dir = std::env::temp_dir().join(format!("docsift-composition-{}", std::process::id()));
    let db = dir.join("db.json");
    let class = dir.join("class.json");

    let mut history = History::open(&db, &class).unwrap();
    history.remember("spec-a", "Automobile", docsift::pages::split_pages(SPEC_A));
    history.save().unwrap();

    let reopened = History::open(&db, &class).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    let pages = reopened.pages("spec-a").unwrap();
    assert_eq!(pages.len(), 3);
    let results = match_keywords(pages, &["shall"], None);
    assert_eq!(results[0].hits.len(), 1);
    assert_eq!(reopened.class_counts(), vec![("Automobile", 1)]);
}
