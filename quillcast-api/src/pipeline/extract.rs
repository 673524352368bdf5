//! Text extraction from stored documents.
//!
//! Takes a reachable document URL, fetches the raw bytes, and branches on
//! the file extension: PDFs go through `pdf-extract` and are truncated to
//! the first [`PDF_TEXT_LIMIT`] characters (narration cost control);
//! everything else is treated as DOCX and extracted in full. Fetch or parse
//! failures abort the surrounding request.

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use reqwest::Client;
use tracing::debug;

/// PDF text is truncated to this many characters before narration.
pub const PDF_TEXT_LIMIT: usize = 5000;

/// Error type for text extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Document could not be fetched
    #[error("{0}")]
    Fetch(String),

    /// PDF parsing failed
    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    /// DOCX parsing failed
    #[error("DOCX parsing failed: {0}")]
    Docx(String),
}

/// Supported document kinds, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Decides the document kind from a URL. Anything that isn't a `.pdf`
    /// takes the DOCX path, mirroring the upload filter which only admits
    /// PDF and Word documents.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Docx
        }
    }
}

/// Fetches `url` and extracts its text.
///
/// PDF output is truncated to [`PDF_TEXT_LIMIT`] characters; DOCX output is
/// returned in full.
pub async fn extract_text(client: &Client, url: &str) -> Result<String, ExtractError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ExtractError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ExtractError::Fetch(format!(
            "document fetch returned status {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractError::Fetch(e.to_string()))?;

    let text = match DocumentKind::from_url(url) {
        DocumentKind::Pdf => {
            let text = parse_pdf(&bytes)?;
            truncate_chars(&text, PDF_TEXT_LIMIT)
        }
        DocumentKind::Docx => parse_docx(&bytes)?,
    };

    debug!(url, chars = text.chars().count(), "Extracted document text");
    Ok(text)
}

/// Extracts plain text from PDF bytes.
pub fn parse_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Extracts raw text from DOCX bytes: paragraph runs joined with newlines,
/// formatting dropped.
pub fn parse_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = read_docx(bytes).map_err(|e| ExtractError::Docx(format!("{e:?}")))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            if !line.is_empty() {
                text.push_str(&line);
                text.push('\n');
            }
        }
    }

    Ok(text)
}

/// Truncates a string to at most `max` characters, respecting char
/// boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_decided_by_extension() {
        assert_eq!(
            DocumentKind::from_url("https://cdn.example.com/doc.pdf"),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_url("https://cdn.example.com/DOC.PDF"),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_url("https://cdn.example.com/doc.docx"),
            DocumentKind::Docx
        );
        assert_eq!(
            DocumentKind::from_url("https://cdn.example.com/doc"),
            DocumentKind::Docx
        );
    }

    #[test]
    fn kind_ignores_query_strings() {
        assert_eq!(
            DocumentKind::from_url("https://cdn.example.com/doc.pdf?token=abc.docx"),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn truncate_respects_the_limit() {
        let text = "a".repeat(6000);
        assert_eq!(truncate_chars(&text, PDF_TEXT_LIMIT).len(), 5000);
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_chars("short", PDF_TEXT_LIMIT), "short");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        let truncated = truncate_chars(&text, 4);
        assert_eq!(truncated.chars().count(), 4);
        assert_eq!(truncated, "éééé");
    }

    #[test]
    fn malformed_pdf_is_an_error() {
        assert!(parse_pdf(b"definitely not a pdf").is_err());
    }

    #[test]
    fn malformed_docx_is_an_error() {
        assert!(parse_docx(b"definitely not a zip archive").is_err());
    }
}
