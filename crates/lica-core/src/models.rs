//! Registered chat models
//!
//! Both models are served from the same OpenAI-compatible endpoint. Only the
//! llama model accepts document analysis requests.

use crate::error::{LicaError, Result};
use serde::Serialize;

/// Larger model, slower, more detailed answers
pub const NEMOTRON: &str = "nvidia/nemotron-4-340b-instruct";

/// Faster model, also used for every document upload
pub const LLAMA: &str = "meta/llama-3.1-405b-instruct";

/// Model preselected when the user makes no choice
pub const DEFAULT_MODEL: &str = LLAMA;

/// A model the assistant may route to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    pub id: &'static str,
    pub description: &'static str,
    pub supports_documents: bool,
}

const SPECS: [ModelSpec; 2] = [
    ModelSpec {
        id: NEMOTRON,
        description: "May take over 2 minutes; more detailed, customized advice",
        supports_documents: false,
    },
    ModelSpec {
        id: LLAMA,
        description: "Faster responses for quick inquiries",
        supports_documents: true,
    },
];

/// Allow-list of model identifiers
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    specs: Vec<ModelSpec>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            specs: SPECS.to_vec(),
        }
    }

    pub fn all(&self) -> &[ModelSpec] {
        &self.specs
    }

    pub fn get(&self, id: &str) -> Option<&ModelSpec> {
        self.specs.iter().find(|spec| spec.id == id)
    }

    /// Look up a model, failing with `InvalidModel` if it is not registered
    pub fn resolve(&self, id: &str) -> Result<&ModelSpec> {
        self.get(id)
            .ok_or_else(|| LicaError::InvalidModel(id.to_string()))
    }

    /// Model used when a document is attached
    pub fn document_model(&self) -> &'static str {
        self.specs
            .iter()
            .find(|spec| spec.supports_documents)
            .map(|spec| spec.id)
            .unwrap_or(LLAMA)
    }

    /// Effective model for a request
    ///
    /// Registered models without document support are swapped for the
    /// document model when a file is attached. Unregistered ids pass through
    /// untouched so the completion step can reject them.
    pub fn effective_model<'a>(&self, requested: &'a str, has_document: bool) -> &'a str {
        match self.get(requested) {
            Some(spec) if has_document && !spec.supports_documents => self.document_model(),
            _ => requested,
        }
    }
}
