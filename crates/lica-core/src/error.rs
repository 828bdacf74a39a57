//! Error types for LICA

use thiserror::Error;

/// Result type alias using LicaError
pub type Result<T> = std::result::Result<T, LicaError>;

/// Error type alias for convenience
pub type Error = LicaError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
}

/// Message shown when the requested model is not registered
pub const INVALID_MODEL_MESSAGE: &str = "Error: Invalid model choice.";

/// Main error type for LICA
#[derive(Debug, Error)]
pub enum LicaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model choice: {0}")]
    InvalidModel(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External service error: {0}")]
    ExternalError(String),
}

impl LicaError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidModel(_) | Self::Config(_) | Self::Yaml(_) => {
                exit_codes::INVALID_INPUT
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }

    /// Text shown in place of a model answer when the completion step fails
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidModel(_) => INVALID_MODEL_MESSAGE.to_string(),
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_model_message_is_fixed() {
        let err = LicaError::InvalidModel("openai/gpt-4".to_string());
        assert_eq!(err.user_message(), "Error: Invalid model choice.");
    }

    #[test]
    fn test_upstream_message_embeds_cause() {
        let err = LicaError::ExternalError("LLM service error (HTTP 401): unauthorized".into());
        let msg = err.user_message();
        assert!(msg.starts_with("Error: "));
        assert!(msg.contains("unauthorized"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            LicaError::Config("bad".into()).exit_code(),
            exit_codes::INVALID_INPUT
        );
        assert_eq!(
            LicaError::ExternalError("down".into()).exit_code(),
            exit_codes::GENERAL_ERROR
        );
    }
}
