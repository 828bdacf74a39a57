//! Configuration management
//!
//! Values are resolved from environment variables first, then the YAML
//! config file, then built-in defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the inference API key
pub const API_KEY_ENV: &str = "NIM_API_KEY";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "LICA_CONFIG";

/// Default OpenAI-compatible inference endpoint
pub const DEFAULT_LLM_URL: &str = "https://integrate.api.nvidia.com/v1";

/// Default tesseract executable
pub const DEFAULT_TESSERACT_CMD: &str = "/usr/local/bin/tesseract";

/// Default LlamaParse REST base URL
pub const DEFAULT_LLAMA_PARSE_URL: &str = "https://api.cloud.llamaindex.ai/api/parsing";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LicaConfig {
    /// Chat-completion service
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// OCR engine for image uploads
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Parser for PDF uploads
    #[serde(default)]
    pub document_parser: DocumentParserConfig,
}

/// LLM service configuration for the chat-completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL shared by every registered model
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Bearer token for the endpoint
    #[serde(default)]
    pub api_key: Option<String>,

    /// Whole-request timeout in seconds; unset means wait for the stream to finish
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

fn default_llm_url() -> String {
    DEFAULT_LLM_URL.to_string()
}

/// Tesseract settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Path to the tesseract executable
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: PathBuf,

    /// Tesseract language code (e.g. "eng"); tesseract's default when unset
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: default_tesseract_cmd(),
            language: None,
        }
    }
}

fn default_tesseract_cmd() -> PathBuf {
    PathBuf::from(DEFAULT_TESSERACT_CMD)
}

/// Which backend turns PDFs into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ParserBackend {
    /// In-process text layer extraction
    #[default]
    Local,
    /// Hosted LlamaParse service (markdown output)
    LlamaParse,
}

impl ParserBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::LlamaParse => "llama_parse",
        }
    }
}

impl std::str::FromStr for ParserBackend {
    type Err = crate::error::LicaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "llama_parse" | "llamaparse" | "llama-parse" => Ok(Self::LlamaParse),
            other => Err(crate::error::LicaError::Config(format!(
                "unknown document parser backend: {}",
                other
            ))),
        }
    }
}

/// Document parser settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentParserConfig {
    #[serde(default)]
    pub backend: ParserBackend,

    #[serde(default = "default_llama_parse_url")]
    pub llama_parse_url: String,

    #[serde(default)]
    pub llama_parse_api_key: Option<String>,

    /// Delay between job status checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Status checks before the job is treated as failed
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

impl Default for DocumentParserConfig {
    fn default() -> Self {
        Self {
            backend: ParserBackend::default(),
            llama_parse_url: default_llama_parse_url(),
            llama_parse_api_key: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

fn default_llama_parse_url() -> String {
    DEFAULT_LLAMA_PARSE_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_polls() -> u32 {
    150
}

impl LicaConfig {
    /// Load config from the default path and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a YAML file, falling back to defaults if it is absent
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: LicaConfig = serde_yaml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(LicaConfig::default())
        }
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Overlay values from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("LICA_LLM_URL") {
            self.llm_service.url = url;
        }
        if let Some(key) = lookup(API_KEY_ENV) {
            self.llm_service.api_key = Some(key);
        }
        if let Some(secs) = lookup("LICA_LLM_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.llm_service.timeout_secs = Some(secs);
        }
        if let Some(cmd) = lookup("LICA_TESSERACT_CMD") {
            self.ocr.tesseract_cmd = PathBuf::from(cmd);
        }
        if let Some(lang) = lookup("LICA_OCR_LANGUAGE") {
            self.ocr.language = Some(lang);
        }
        if let Some(backend) = lookup("LICA_DOCUMENT_PARSER") {
            match backend.parse() {
                Ok(backend) => self.document_parser.backend = backend,
                Err(e) => tracing::warn!("Ignoring LICA_DOCUMENT_PARSER: {}", e),
            }
        }
        if let Some(key) = lookup("LLAMA_CLOUD_API_KEY") {
            self.document_parser.llama_parse_api_key = Some(key);
        }
    }

    /// Copy of the config with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.llm_service.api_key = config.llm_service.api_key.as_ref().map(|_| redact());
        config.document_parser.llama_parse_api_key = config
            .document_parser
            .llama_parse_api_key
            .as_ref()
            .map(|_| redact());
        config
    }
}

fn redact() -> String {
    "********".to_string()
}
