//! Multi-format text extraction

use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::FileType;

/// Typographic characters that PDF and Word text commonly carries, with plain replacements
const CHARACTER_FIXUPS: &[(char, &str)] = &[
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2022}', "* "),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\0', ""),
];

/// Text extracted from one file
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
    /// Content hash for deduplication
    pub content_hash: String,
    /// Total pages (PDF only)
    pub total_pages: Option<u32>,
}

impl ParsedDocument {
    fn new(file_type: FileType, content: String, total_pages: Option<u32>) -> Self {
        Self {
            file_type,
            content_hash: hash_content(&content),
            content,
            total_pages,
        }
    }
}

/// Multi-format file parser
#[derive(Debug, Clone)]
pub struct FileParser {
    /// Upper bound on a single pdf-extract run before falling back to lopdf
    pdf_timeout: Duration,
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl FileParser {
    /// Create a parser with the given PDF extraction timeout
    pub fn new(pdf_timeout: Duration) -> Self {
        Self { pdf_timeout }
    }

    /// Parse a file based on its extension
    pub fn parse(&self, filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        let file_type = FileType::from_extension(extension);

        let parsed = match file_type {
            FileType::Pdf => self.parse_pdf(filename, data)?,
            FileType::Docx => Self::parse_docx(filename, data)?,
            FileType::Email => Self::parse_email(filename, data)?,
            FileType::Txt | FileType::Markdown => Self::parse_text(data, file_type),
            FileType::Unknown => {
                return Err(Error::UnsupportedFileType(format!(
                    "{} ({})",
                    if extension.is_empty() { "<none>" } else { extension },
                    filename
                )))
            }
        };

        if parsed.content.trim().is_empty() {
            return Err(Error::file_parse(filename, "No text content could be extracted"));
        }

        Ok(parsed)
    }

    /// Parse PDF document
    fn parse_pdf(&self, filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let content = self.extract_pdf_with_timeout(filename, data)?;
        let content = normalize_lines(&cleanup_text(&content));

        let total_pages = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        Ok(ParsedDocument::new(FileType::Pdf, content, total_pages))
    }

    /// Run pdf-extract on a watchdog thread; some fonts make it spin for minutes
    fn extract_pdf_with_timeout(&self, filename: &str, data: &[u8]) -> Result<String> {
        use std::sync::mpsc;
        use std::thread;

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(pdf_extract::extract_text_from_mem(&data_vec));
        });

        match rx.recv_timeout(self.pdf_timeout) {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => {
                tracing::debug!("pdf-extract returned no text for {}, trying lopdf", filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed for {}: {}, trying lopdf", filename, e);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!(
                    "PDF extraction of {} timed out after {:?}, trying lopdf",
                    filename,
                    self.pdf_timeout
                );
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread for {} crashed", filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
        }
    }

    /// Page-by-page extraction with lopdf
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let mut all_text = String::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => {
                    all_text.push_str(&text);
                    all_text.push('\n');
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("No text on page {} of {}: {}", page_number, filename, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(all_text)
    }

    /// Parse DOCX document: body paragraphs and table cells, in order
    fn parse_docx(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let docx = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();
        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => {
                    push_paragraph(&mut content, p);
                }
                docx_rs::DocumentChild::Table(table) => {
                    for row in &table.rows {
                        let docx_rs::TableChild::TableRow(row) = row;
                        let cells: Vec<String> = row
                            .cells
                            .iter()
                            .map(|cell| {
                                let docx_rs::TableRowChild::TableCell(cell) = cell;
                                let mut cell_text = String::new();
                                for cell_child in &cell.children {
                                    if let docx_rs::TableCellContent::Paragraph(p) = cell_child {
                                        push_paragraph(&mut cell_text, p);
                                    }
                                }
                                cell_text.trim().replace('\n', " ")
                            })
                            .collect();
                        if cells.iter().any(|c| !c.is_empty()) {
                            content.push_str(&cells.join(" | "));
                            content.push('\n');
                        }
                    }
                }
                _ => {}
            }
        }

        let content = normalize_lines(&cleanup_text(&content));
        Ok(ParsedDocument::new(FileType::Docx, content, None))
    }

    /// Parse an RFC 822 message: a short header block followed by every text body
    fn parse_email(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let message = mail_parser::MessageParser::default()
            .parse(data)
            .ok_or_else(|| Error::file_parse(filename, "Not a valid email message"))?;

        let mut content = String::new();
        if let Some(subject) = message.subject() {
            content.push_str(&format!("Subject: {}\n", subject));
        }
        if let Some(from) = message.from().and_then(|addr| addr.first()) {
            match (from.name(), from.address()) {
                (Some(name), Some(address)) => content.push_str(&format!("From: {} <{}>\n", name, address)),
                (None, Some(address)) => content.push_str(&format!("From: {}\n", address)),
                (Some(name), None) => content.push_str(&format!("From: {}\n", name)),
                (None, None) => {}
            }
        }
        if let Some(date) = message.date() {
            content.push_str(&format!("Date: {}\n", date.to_rfc3339()));
        }
        if !content.is_empty() {
            content.push('\n');
        }

        let mut body_index = 0;
        while let Some(body) = message.body_text(body_index) {
            if !body.trim().is_empty() {
                content.push_str(body.trim());
                content.push_str("\n\n");
            }
            body_index += 1;
        }

        let content = cleanup_text(content.trim_end());
        Ok(ParsedDocument::new(FileType::Email, content, None))
    }

    /// Parse plain text or markdown
    fn parse_text(data: &[u8], file_type: FileType) -> ParsedDocument {
        let content = String::from_utf8_lossy(data).replace("\r\n", "\n");
        ParsedDocument::new(file_type, content, None)
    }
}

fn push_paragraph(out: &mut String, paragraph: &docx_rs::Paragraph) {
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    docx_rs::RunChild::Text(t) => out.push_str(&t.text),
                    docx_rs::RunChild::Tab(_) => out.push('\t'),
                    _ => {}
                }
            }
        }
    }
    out.push('\n');
}

/// Replace typographic glyphs with plain equivalents
fn cleanup_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match CHARACTER_FIXUPS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => result.push_str(to),
            None => result.push(c),
        }
    }
    result
}

/// Trim every line and drop the empty ones
fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Hash content for deduplication
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
