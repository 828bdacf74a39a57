//! Text extraction from uploaded documents
//!
//! Images go through an OCR engine, PDFs through a document parser. Callers
//! that only want text use [`extract_or_empty`], which logs any failure and
//! returns an empty string so a broken upload never blocks the answer.

use crate::config::{LicaConfig, ParserBackend};
use crate::error::{LicaError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod llama_parse;
pub mod ocr;
pub mod pdf;

pub use llama_parse::LlamaParseClient;
pub use ocr::TesseractOcr;
pub use pdf::PdfTextParser;

/// Supported upload kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
}

impl FileKind {
    /// Detect the kind from a file name's extension (case-insensitive)
    pub fn detect(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();

        match ext.as_str() {
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
        }
    }
}

/// A user-supplied file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Where the bytes live on disk
    pub path: PathBuf,
    /// Name used for extension sniffing
    pub name: String,
}

impl UploadedFile {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Use the path's own file name for sniffing
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, name }
    }

    pub fn kind(&self) -> Option<FileKind> {
        FileKind::detect(&self.name)
    }
}

/// One logical piece of a parsed document (usually a page)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegment {
    pub text: String,
}

impl ParsedSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Optical character recognition over a single image file
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, path: &Path) -> Result<String>;

    fn engine_name(&self) -> &str;
}

/// Turns a single document into text segments
#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(&self, path: &Path) -> Result<Vec<ParsedSegment>>;

    fn parser_name(&self) -> &str;
}

/// Text extraction for any supported file kind
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path, kind: FileKind) -> Result<String>;
}

/// Extract text, logging failures and falling back to an empty string
pub async fn extract_or_empty(extractor: &dyn TextExtractor, path: &Path, kind: FileKind) -> String {
    match extractor.extract(path, kind).await {
        Ok(text) => {
            tracing::debug!(
                "Extracted {} chars from {} {:?}",
                text.len(),
                kind.as_str(),
                path
            );
            text
        }
        Err(e) => {
            tracing::warn!("Error parsing {} {:?}: {}", kind.as_str(), path, e);
            String::new()
        }
    }
}

/// Join segment texts with single spaces
pub fn join_segments(segments: &[ParsedSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extractor that dispatches images to OCR and PDFs to a parser
pub struct DocumentExtractor {
    ocr: Arc<dyn OcrEngine>,
    parser: Arc<dyn DocumentParser>,
}

impl DocumentExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>, parser: Arc<dyn DocumentParser>) -> Self {
        Self { ocr, parser }
    }

    /// Build the OCR engine and parser named by the configuration
    ///
    /// A parser that cannot be set up is replaced by one that fails every
    /// parse, so the request still gets an answer with empty context.
    pub fn from_config(config: &LicaConfig) -> Self {
        let ocr: Arc<dyn OcrEngine> = Arc::new(TesseractOcr::from_config(&config.ocr));
        let parser: Arc<dyn DocumentParser> = match config.document_parser.backend {
            ParserBackend::Local => Arc::new(PdfTextParser::new()),
            ParserBackend::LlamaParse => {
                match LlamaParseClient::from_config(&config.document_parser) {
                    Ok(client) => Arc::new(client),
                    Err(e) => {
                        tracing::warn!("Document parser unavailable: {}", e);
                        Arc::new(UnavailableParser::new("llama_parse", e.to_string()))
                    }
                }
            }
        };

        tracing::debug!(
            "Document extractor: ocr={}, parser={}",
            ocr.engine_name(),
            parser.parser_name()
        );

        Self::new(ocr, parser)
    }
}

/// Stand-in for a parser whose setup failed
pub struct UnavailableParser {
    name: &'static str,
    reason: String,
}

impl UnavailableParser {
    pub fn new(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name,
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DocumentParser for UnavailableParser {
    async fn parse(&self, _path: &Path) -> Result<Vec<ParsedSegment>> {
        Err(LicaError::Config(format!("{} is unavailable: {}", self.name, self.reason)))
    }

    fn parser_name(&self) -> &str {
        self.name
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, path: &Path, kind: FileKind) -> Result<String> {
        match kind {
            FileKind::Image => self.ocr.recognize(path).await,
            FileKind::Pdf => {
                let segments = self.parser.parse(path).await?;
                Ok(join_segments(&segments))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn recognize(&self, _path: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn engine_name(&self) -> &str {
            "fixed"
        }
    }

    struct FixedParser(Vec<&'static str>);

    #[async_trait]
    impl DocumentParser for FixedParser {
        async fn parse(&self, _path: &Path) -> Result<Vec<ParsedSegment>> {
            Ok(self.0.iter().map(|t| ParsedSegment::new(*t)).collect())
        }

        fn parser_name(&self) -> &str {
            "fixed"
        }
    }

    struct BrokenParser;

    #[async_trait]
    impl DocumentParser for BrokenParser {
        async fn parse(&self, _path: &Path) -> Result<Vec<ParsedSegment>> {
            Err(LicaError::Parse("corrupt xref table".to_string()))
        }

        fn parser_name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(FileKind::detect("scan.png"), Some(FileKind::Image));
        assert_eq!(FileKind::detect("scan.JPG"), Some(FileKind::Image));
        assert_eq!(FileKind::detect("/tmp/x/photo.jpeg"), Some(FileKind::Image));
        assert_eq!(FileKind::detect("Report.PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect("notes.txt"), None);
        assert_eq!(FileKind::detect("archive.pdf.zip"), None);
        assert_eq!(FileKind::detect("README"), None);
    }

    #[test]
    fn test_uploaded_file_from_path() {
        let file = UploadedFile::from_path("/tmp/uploads/credit_report.pdf");
        assert_eq!(file.name, "credit_report.pdf");
        assert_eq!(file.kind(), Some(FileKind::Pdf));
    }

    #[tokio::test]
    async fn test_pdf_segments_joined_with_spaces() {
        let extractor = DocumentExtractor::new(
            Arc::new(FixedOcr("unused")),
            Arc::new(FixedParser(vec!["Page one", "Page two", "Page three"])),
        );
        let text = extractor
            .extract(Path::new("report.pdf"), FileKind::Pdf)
            .await
            .unwrap();
        assert_eq!(text, "Page one Page two Page three");
    }

    #[tokio::test]
    async fn test_image_goes_to_ocr() {
        let extractor = DocumentExtractor::new(
            Arc::new(FixedOcr("FICO 712")),
            Arc::new(FixedParser(vec![])),
        );
        let text = extractor
            .extract(Path::new("score.png"), FileKind::Image)
            .await
            .unwrap();
        assert_eq!(text, "FICO 712");
    }

    #[tokio::test]
    async fn test_extract_or_empty_swallows_failure() {
        let extractor =
            DocumentExtractor::new(Arc::new(FixedOcr("unused")), Arc::new(BrokenParser));
        let text = extract_or_empty(&extractor, Path::new("bad.pdf"), FileKind::Pdf).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_llama_parse_without_key_degrades_to_empty() {
        let mut config = LicaConfig::default();
        config.document_parser.backend = ParserBackend::LlamaParse;
        config.document_parser.llama_parse_api_key = None;

        let extractor = DocumentExtractor::from_config(&config);
        let err = extractor
            .extract(Path::new("statement.pdf"), FileKind::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, LicaError::Config(msg) if msg.contains("llama_parse")));

        let text = extract_or_empty(&extractor, Path::new("statement.pdf"), FileKind::Pdf).await;
        assert_eq!(text, "");
    }
}
