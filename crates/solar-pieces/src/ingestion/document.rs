//! DOCX data-section extraction
//!
//! A Solargis report carries its time series as plain comma separated
//! paragraphs below a `#Data:` marker paragraph. Everything before the
//! marker is report prose and is ignored.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::log::PieceLog;

/// Position of the scanner relative to the data section of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Sentinel not seen yet, paragraphs are skipped
    BeforeSentinel,
    /// Sentinel seen, non-empty paragraphs are data lines
    InDataRegion,
}

/// Line-by-line scanner for the data section of a single document
#[derive(Debug, Clone)]
pub struct DataRegionScanner<'a> {
    sentinel: &'a str,
    state: ScanState,
}

impl<'a> DataRegionScanner<'a> {
    pub fn new(sentinel: &'a str) -> Self {
        Self {
            sentinel,
            state: ScanState::BeforeSentinel,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Feed one paragraph, returning it trimmed when it is a data line
    pub fn feed(&mut self, paragraph: &str) -> Option<String> {
        let line = paragraph.trim();
        if line.contains(self.sentinel) {
            self.state = ScanState::InDataRegion;
            return None;
        }

        match self.state {
            ScanState::InDataRegion if !line.is_empty() => Some(line.to_string()),
            _ => None,
        }
    }

    /// Scan a whole document
    pub fn scan<I, S>(mut self, paragraphs: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paragraphs
            .into_iter()
            .filter_map(|p| self.feed(p.as_ref()))
            .collect()
    }
}

/// Extract data lines from every document, in order.
///
/// Missing files are skipped with a warning. Each document needs its own
/// sentinel before it contributes lines.
pub fn read_docx_files(
    paths: &[PathBuf],
    sentinel: &str,
    log: &dyn PieceLog,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    for path in paths {
        if !path.exists() {
            log.warn(&format!("File not found: {}", path.display()));
            continue;
        }

        log.info(&format!("Processing DOCX document: {}", path.display()));
        let data = std::fs::read(path)?;
        let paragraphs = read_paragraphs(path, &data, log)?;

        let found = DataRegionScanner::new(sentinel).scan(&paragraphs);
        log.debug(&format!(
            "{}: {} paragraphs, {} data lines",
            path.display(),
            paragraphs.len(),
            found.len()
        ));
        lines.extend(found);
    }

    Ok(lines)
}

/// Body paragraphs of a DOCX package, falling back to a raw XML scan when
/// docx-rs rejects the package
pub fn read_paragraphs(path: &Path, data: &[u8], log: &dyn PieceLog) -> Result<Vec<String>> {
    match docx_rs::read_docx(data) {
        Ok(docx) => Ok(paragraphs_from_docx(&docx)),
        Err(e) => {
            log.warn(&format!(
                "docx reader failed for {} ({}), scanning document.xml directly",
                path.display(),
                e
            ));
            let xml = document_xml(data)
                .map_err(|e| Error::file_parse(path.display().to_string(), e))?;
            paragraphs_from_document_xml(&xml)
                .map_err(|e| Error::file_parse(path.display().to_string(), e))
        }
    }
}

/// Text of each top-level body paragraph
fn paragraphs_from_docx(docx: &docx_rs::Docx) -> Vec<String> {
    let mut paragraphs = Vec::new();

    for child in &docx.document.children {
        // Table cell paragraphs are not body paragraphs
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut text = String::new();
            push_paragraph_text(&p.children, &mut text);
            paragraphs.push(text);
        }
    }

    paragraphs
}

/// Visible text of paragraph content, including hyperlinks and inserted
/// revisions. Deleted revisions are skipped.
fn push_paragraph_text(children: &[docx_rs::ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, text),
            docx_rs::ParagraphChild::Hyperlink(link) => push_paragraph_text(&link.children, text),
            docx_rs::ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = child {
                        push_run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &docx_rs::Run, text: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(t) => text.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => text.push('\t'),
            docx_rs::RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn document_xml(data: &[u8]) -> std::result::Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| e.to_string())?;
    let mut file = archive
        .by_name("word/document.xml")
        .map_err(|e| e.to_string())?;
    let mut xml = String::new();
    file.read_to_string(&mut xml).map_err(|e| e.to_string())?;
    Ok(xml)
}

/// Collect body paragraphs from WordprocessingML
pub(crate) fn paragraphs_from_document_xml(xml: &str) -> std::result::Result<Vec<String>, String> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut table_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"p" => current.clear(),
                b"r" => in_run = true,
                b"t" => in_text = in_run,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if in_run => current.push('\t'),
                b"br" | b"cr" if in_run => current.push('\n'),
                b"p" if table_depth == 0 => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e.unescape().map_err(|e| e.to_string())?;
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => {
                    if table_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Level, MemoryLog};
    use docx_rs::{Docx, Hyperlink, HyperlinkType, Insert, Paragraph, Run};

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let file = std::fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    #[test]
    fn test_scanner_skips_blank_lines() {
        let lines = DataRegionScanner::new("#Data:").scan(["#Data:", "1,2,3", "", "4,5,6"]);
        assert_eq!(lines, vec!["1,2,3", "4,5,6"]);
    }

    #[test]
    fn test_scanner_ignores_lines_before_sentinel() {
        let mut scanner = DataRegionScanner::new("#Data:");
        assert_eq!(scanner.feed("Site: Example"), None);
        assert_eq!(scanner.feed("a,b,c"), None);
        assert_eq!(scanner.state(), ScanState::BeforeSentinel);

        // Marker may be embedded in a longer line
        assert_eq!(scanner.feed("  #Data: (15 min)  "), None);
        assert_eq!(scanner.state(), ScanState::InDataRegion);
        assert_eq!(scanner.feed("  1;2  "), Some("1;2".to_string()));
        assert_eq!(scanner.feed("   "), None);
    }

    #[test]
    fn test_scanner_without_sentinel_yields_nothing() {
        let lines = DataRegionScanner::new("#Data:").scan(["1,2,3", "4,5,6"]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_read_docx_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.docx");
        let second = dir.path().join("second.docx");
        write_docx(
            &first,
            &["Solargis report", "Date,GHI", "#Data:", "1,2,3", "", "4,5,6"],
        );
        // No sentinel, contributes nothing
        write_docx(&second, &["7,8,9"]);

        let log = MemoryLog::new();
        let lines = read_docx_files(&[first, second], "#Data:", &log).unwrap();
        assert_eq!(lines, vec!["1,2,3", "4,5,6"]);
    }

    #[test]
    fn test_state_resets_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.docx");
        let b = dir.path().join("b.docx");
        write_docx(&a, &["#Data:", "1,1"]);
        write_docx(&b, &["header", "#Data:", "2,2"]);

        let log = MemoryLog::new();
        let lines = read_docx_files(&[a, b], "#Data:", &log).unwrap();
        assert_eq!(lines, vec!["1,1", "2,2"]);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.docx");
        write_docx(&present, &["#Data:", "10,20"]);
        let missing = dir.path().join("missing.docx");

        let log = MemoryLog::new();
        let lines = read_docx_files(&[missing, present], "#Data:", &log).unwrap();
        assert_eq!(lines, vec!["10,20"]);
        let warnings = log.messages(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("missing.docx"));
    }

    #[test]
    fn test_not_a_docx_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"plain text, not a zip").unwrap();

        let log = MemoryLog::new();
        let err = read_docx_files(&[path], "#Data:", &log).unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_document_xml_fallback() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:p><w:r><w:t>#Data:</w:t></w:r></w:p>
    <w:p><w:r><w:t>1,</w:t></w:r><w:r><w:t>2</w:t><w:tab/><w:t>x</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t xml:space="preserve">3 &amp; 4</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let paragraphs = paragraphs_from_document_xml(xml).unwrap();
        assert_eq!(paragraphs, vec!["Intro", "#Data:", "1,2\tx", "", "3 & 4"]);
    }

    #[test]
    fn test_hyperlink_and_insert_text_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linked.docx");
        let row = Paragraph::new()
            .add_run(Run::new().add_text("2024-01-01,"))
            .add_hyperlink(
                Hyperlink::new("site", HyperlinkType::Anchor).add_run(Run::new().add_text("812")),
            )
            .add_insert(Insert::new(Run::new().add_text(",95")));
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("#Data:")))
            .add_paragraph(row)
            .build()
            .pack(std::fs::File::create(&path).unwrap())
            .unwrap();

        let log = MemoryLog::new();
        let lines = read_docx_files(&[path], "#Data:", &log).unwrap();
        assert_eq!(lines, vec!["2024-01-01,812,95"]);
    }
}
