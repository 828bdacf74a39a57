//! LICA Core Library
//!
//! Core functionality for LICA, a document-aware financial education
//! assistant.
//!
//! # Features
//! - OCR for uploaded images (tesseract)
//! - PDF text extraction, locally or through LlamaParse
//! - Streaming chat completions against OpenAI-compatible endpoints
//! - Fixed routing policy: help text, unsupported uploads, document model override

pub mod assistant;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod models;
pub mod prompt;

pub use assistant::{Assistant, AssistantReply, ReplyKind};
pub use config::{DocumentParserConfig, LLMServiceConfig, LicaConfig, OcrConfig, ParserBackend};
pub use error::{Error, LicaError, Result};
pub use extract::{
    DocumentExtractor, DocumentParser, FileKind, LlamaParseClient, OcrEngine, ParsedSegment,
    PdfTextParser, TesseractOcr, TextExtractor, UnavailableParser, UploadedFile,
};
pub use llm::{
    accumulate_fragments, ChatMessage, CompletionBackend, CompletionClient, DecodingParams,
    FragmentStream, NimClient,
};
pub use models::{ModelRegistry, ModelSpec, DEFAULT_MODEL, LLAMA, NEMOTRON};
pub use prompt::{build_prompt, PromptKind};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "lica";
