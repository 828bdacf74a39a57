//! Local PDF parser backed by pdf-extract

use super::{DocumentParser, ParsedSegment};
use crate::error::{LicaError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Page separator emitted in extracted text
const PAGE_BREAK: char = '\u{000C}';

/// Extracts the text layer of a PDF, one segment per non-blank page
pub struct PdfTextParser;

impl Default for PdfTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfTextParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from PDF bytes
    fn extract_text(bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| LicaError::Parse(format!("Failed to extract text from PDF: {}", e)))
    }
}

/// Split extracted text into trimmed, non-blank pages
fn split_pages(text: &str) -> Vec<ParsedSegment> {
    text.split(PAGE_BREAK)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(ParsedSegment::new)
        .collect()
}

#[async_trait]
impl DocumentParser for PdfTextParser {
    async fn parse(&self, path: &Path) -> Result<Vec<ParsedSegment>> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            LicaError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read PDF file {:?}: {}", path, e),
            ))
        })?;

        let text = tokio::task::spawn_blocking(move || Self::extract_text(&bytes))
            .await
            .map_err(|e| LicaError::Parse(format!("PDF extraction aborted: {}", e)))??;

        let segments = split_pages(&text);
        if segments.is_empty() {
            tracing::debug!("PDF {:?} has no text layer (may be image-based)", path);
        }
        Ok(segments)
    }

    fn parser_name(&self) -> &str {
        "pdf-extract"
    }
}
