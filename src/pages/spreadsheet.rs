// Excel workbook provider: one page per row of the first worksheet.
//
// The page text is the second column; the first row is a header and is
// skipped. Workbooks (.xlsx / .xlsm) are zip archives of XML parts, and only
// the shared string table and the first worksheet are read.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use super::PageSource;

/// 1-based column holding the page text (`B`).
pub const PAGE_COLUMN: u32 = 2;

const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const WORKSHEET_PREFIX: &str = "xl/worksheets/sheet";

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

/// An Excel workbook whose rows are pages.
pub struct SpreadsheetFile {
    pub path: PathBuf,
}

impl PageSource for SpreadsheetFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn pages(&self) -> Result<Vec<String>> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let pages = workbook_pages(&bytes)
            .with_context(|| format!("Failed to read workbook {}", self.path.display()))?;
        info!(path = %self.path.display(), pages = pages.len(), "Read workbook rows");
        Ok(pages)
    }
}

/// Pages from an in-memory workbook.
///
/// Rows between the header and the last non-empty row each become a page;
/// a row with no value in the page column yields an empty page.
pub fn workbook_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("Not a zip archive")?;

    let has_shared = archive.file_names().any(|n| n == SHARED_STRINGS);
    let shared = if has_shared {
        shared_strings(&read_entry(&mut archive, SHARED_STRINGS)?)?
    } else {
        Vec::new()
    };

    let Some(sheet) = first_worksheet(&archive) else {
        bail!("Workbook has no worksheets");
    };
    debug!(sheet = %sheet, shared = shared.len(), "Reading worksheet");
    column_pages(&read_entry(&mut archive, &sheet)?, &shared, PAGE_COLUMN)
}

/// Lowest-numbered `xl/worksheets/sheetN.xml`.
fn first_worksheet(archive: &Archive<'_>) -> Option<String> {
    archive
        .file_names()
        .filter_map(|name| {
            let number: u32 = name
                .strip_prefix(WORKSHEET_PREFIX)?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name.to_string()))
        })
        .min_by_key(|(number, _)| *number)
        .map(|(_, name)| name)
}

fn read_entry(archive: &mut Archive<'_>, name: &str) -> Result<Vec<u8>> {
    let entry = archive
        .by_name(name)
        .with_context(|| format!("Missing workbook part {name}"))?;
    let mut out = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut out)
        .with_context(|| format!("Failed to unpack {name}"))?;
    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        bail!("Workbook part {name} exceeds {MAX_XML_ENTRY_BYTES} bytes");
    }
    Ok(out)
}

/// The shared string table. Rich-text runs are concatenated; phonetic
/// hints (`rPh`) are skipped.
fn shared_strings(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader
            .read_event_into(&mut buf)
            .context("Malformed shared string table")?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => in_phonetic = true,
                b"t" => in_text = !in_phonetic,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(t) if in_text => {
                if let Some(s) = current.as_mut() {
                    s.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => strings.extend(current.take()),
                b"rPh" => in_phonetic = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// A cell being read: its `t` attribute and raw text.
struct Cell {
    kind: String,
    text: String,
}

impl Cell {
    fn resolve(self, shared: &[String]) -> Result<String> {
        if self.kind != "s" {
            return Ok(self.text);
        }
        let index: usize = self
            .text
            .trim()
            .parse()
            .with_context(|| format!("Bad shared string index {:?}", self.text))?;
        shared
            .get(index)
            .cloned()
            .with_context(|| format!("Shared string {index} out of range"))
    }
}

/// Values of `column` for every row after the header row.
fn column_pages(xml: &[u8], shared: &[String], column: u32) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut values: BTreeMap<u32, String> = BTreeMap::new();
    let mut header: Option<u32> = None;
    let mut last_row = 0;
    let mut row = 0;
    let mut col = 0;
    let mut cell: Option<Cell> = None;
    let mut in_value = false;

    loop {
        match reader.read_event_into(&mut buf).context("Malformed worksheet")? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    row = row_number(&e, row)?;
                    header.get_or_insert(row);
                    col = 0;
                }
                b"c" => {
                    col = cell_column(&e, col)?;
                    cell = Some(Cell {
                        kind: attribute(&e, b"t")?.unwrap_or_default(),
                        text: String::new(),
                    });
                }
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    row = row_number(&e, row)?;
                    header.get_or_insert(row);
                    col = 0;
                }
                b"c" => col = cell_column(&e, col)?,
                _ => {}
            },
            Event::Text(t) if in_value => {
                if let Some(c) = cell.as_mut() {
                    c.text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(done) = cell.take() {
                        let value = done.resolve(shared)?;
                        if header.is_some_and(|h| row > h) && !value.is_empty() {
                            last_row = last_row.max(row);
                            if col == column {
                                values.insert(row, value);
                            }
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let Some(header) = header else {
        return Ok(Vec::new());
    };
    Ok((header + 1..=last_row)
        .map(|r| values.remove(&r).unwrap_or_default())
        .collect())
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.context("Malformed worksheet attribute")?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// `r="12"` on a row, or the row after `previous`.
fn row_number(e: &BytesStart<'_>, previous: u32) -> Result<u32> {
    Ok(attribute(e, b"r")?
        .and_then(|r| r.parse().ok())
        .unwrap_or(previous + 1))
}

/// Column of a cell from its `r="B12"` reference, or the next column.
fn cell_column(e: &BytesStart<'_>, previous: u32) -> Result<u32> {
    Ok(attribute(e, b"r")?
        .and_then(|r| column_index(&r))
        .unwrap_or(previous + 1))
}

/// 1-based column number of a cell reference (`"B12"` → 2, `"AA3"` → 27).
pub fn column_index(reference: &str) -> Option<u32> {
    let letters: Vec<char> = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    Some(letters.iter().fold(0, |acc, c| {
        acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn workbook(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        for (name, body) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    const SHARED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<si><t>Id</t></si><si><t>Text</t></si>
<si><r><t xml:space="preserve">Section 1 </t></r><r><t>Scope</t></r></si>
</sst>"#;

    const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2"><v>1</v></c><c r="B2" t="s"><v>2</v></c></row>
<row r="3"><c r="A3"><v>2</v></c></row>
<row r="4"><c r="A4"><v>3</v></c><c r="B4" t="inlineStr"><is><t>Brakes &amp; lamps shall work</t></is></c></row>
<row r="5"><c r="B5"><v>42</v></c></row>
</sheetData></worksheet>"#;

    #[test]
    fn test_second_column_rows_become_pages() {
        let bytes = workbook(&[
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        let pages = workbook_pages(&bytes).unwrap();
        assert_eq!(
            pages,
            vec!["Section 1 Scope", "", "Brakes & lamps shall work", "42"]
        );
    }

    #[test]
    fn test_only_first_sheet_is_read() {
        let other = SHEET.replace("42", "99");
        let bytes = workbook(&[
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet2.xml", other.as_str()),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        let pages = workbook_pages(&bytes).unwrap();
        assert_eq!(pages.last().map(String::as_str), Some("42"));
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let sheet = r#"<worksheet><sheetData><row r="1"><c r="B1" t="inlineStr"><is><t>Text</t></is></c></row></sheetData></worksheet>"#;
        let bytes = workbook(&[("xl/worksheets/sheet1.xml", sheet)]);
        assert!(workbook_pages(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_workbooks() {
        assert!(workbook_pages(b"not a zip").is_err());
        let bytes = workbook(&[("word/document.xml", "<w:document/>")]);
        assert!(workbook_pages(&bytes).is_err());
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("B12"), Some(2));
        assert_eq!(column_index("aa3"), Some(27));
        assert_eq!(column_index("12"), None);
    }
}
