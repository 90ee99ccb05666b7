//! Text Extractor — turns an uploaded binary document into a string.
//!
//! Failure is silent by contract: any parser error is logged and yields an
//! empty string, which the pipeline then treats as "skip this file".

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Pdf,
    Word,
    PlainText,
}

/// Media-type dispatch with a filename-extension fallback for the
/// `application/octet-stream` uploads browsers sometimes send.
fn detect(content_type: &str, filename: &str) -> SourceKind {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("pdf") {
        return SourceKind::Pdf;
    }
    if content_type.contains("wordprocessingml") || content_type.contains("msword") {
        return SourceKind::Word;
    }

    let extension = filename.rsplit('.').next().map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => SourceKind::Pdf,
        Some("docx") | Some("doc") => SourceKind::Word,
        _ => SourceKind::PlainText,
    }
}

/// Extracts text from an uploaded document. Never fails: parser errors are
/// logged and produce an empty string.
pub fn extract_text(bytes: &[u8], content_type: &str, filename: &str) -> String {
    let result = match detect(content_type, filename) {
        SourceKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| anyhow::anyhow!("PDF text extraction failed: {e}")),
        SourceKind::Word => extract_docx(bytes),
        SourceKind::PlainText => String::from_utf8(bytes.to_vec())
            .context("upload is not valid UTF-8 text"),
    };

    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to extract text from '{filename}': {e:#}");
            String::new()
        }
    }
}

/// Reads `word/document.xml` out of the docx zip container and collects its
/// text nodes, one line per paragraph.
fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("docx is not a valid zip archive")?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("docx has no word/document.xml")?
        .read_to_string(&mut xml)
        .context("failed to read word/document.xml")?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    loop {
        match reader.read_event().context("malformed document.xml")? {
            Event::Text(t) => {
                text.push_str(&t.unescape().context("bad XML escape in document.xml")?)
            }
            Event::End(e) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}
