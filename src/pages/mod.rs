// Page providers: turn a source document into an ordered list of page texts.
//
// The analyses never look at files. They receive `&[String]`, one entry per
// page, from whichever provider matches the input.

pub mod spreadsheet;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub use spreadsheet::SpreadsheetFile;

/// Page separator used by pdftotext-style plain text exports.
pub const FORM_FEED: char = '\u{000C}';

/// Trait for anything that can produce a document's pages.
pub trait PageSource {
    /// Short human-readable description of the source (usually the path).
    fn describe(&self) -> String;

    /// Read the document and return its pages in order.
    fn pages(&self) -> Result<Vec<String>>;
}

/// A PDF file, extracted page by page with `pdf-extract`.
pub struct PdfFile {
    pub path: PathBuf,
}

impl PageSource for PdfFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn pages(&self) -> Result<Vec<String>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
            .with_context(|| format!("Failed to extract text from PDF {}", self.path.display()))?;
        info!(path = %self.path.display(), pages = pages.len(), "Extracted PDF pages");
        Ok(pages)
    }
}

/// A plain text file with pages separated by form feeds.
///
/// A file without form feeds is a single page. A trailing form feed (as
/// pdftotext writes) does not create an extra empty page.
pub struct TextFile {
    pub path: PathBuf,
}

impl PageSource for TextFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn pages(&self) -> Result<Vec<String>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let pages = split_pages(&raw);
        info!(path = %self.path.display(), pages = pages.len(), "Read text pages");
        Ok(pages)
    }
}

/// Split form-feed separated text into pages.
pub fn split_pages(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    let trimmed = raw.strip_suffix(FORM_FEED).unwrap_or(raw);
    trimmed.split(FORM_FEED).map(str::to_string).collect()
}

/// Pick a provider from the file extension: `.pdf`, `.xlsx` / `.xlsm`,
/// anything else is text.
pub fn source_for(path: &Path) -> Box<dyn PageSource> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let path = path.to_path_buf();

    match extension.as_str() {
        "pdf" => Box::new(PdfFile { path }),
        "xlsx" | "xlsm" => Box::new(SpreadsheetFile { path }),
        _ => Box::new(TextFile { path }),
    }
}

/// Convenience: read a document's pages from a path.
pub fn load_pages(path: &Path) -> Result<Vec<String>> {
    source_for(path).pages()
}
