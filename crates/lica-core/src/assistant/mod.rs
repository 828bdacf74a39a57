//! Request orchestration
//!
//! Routes a request, extracts document text, asks the model, and wraps the
//! answer for display. Every path ends in a display string.

mod messages;
mod routing;

pub use messages::{
    answer_message, processing_error_message, welcome_message, DISCLAIMER,
    UNSUPPORTED_FORMAT_MESSAGE,
};
pub use routing::{route, DocumentRef, RequestInput, Route};

use crate::config::LicaConfig;
use crate::error::Result;
use crate::extract::{extract_or_empty, DocumentExtractor, TextExtractor, UploadedFile};
use crate::llm::{CompletionClient, FragmentObserver, NimClient};
use crate::models::ModelRegistry;
use crate::prompt::build_prompt;
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// How a reply was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Help,
    Unsupported,
    Answer,
    /// The completion step failed; its error text is in place of the answer
    CompletionFailed,
    /// The pipeline itself failed
    Failed,
}

/// Display text plus what produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub text: String,
    pub kind: ReplyKind,
    /// Model actually asked, if any
    pub effective_model: Option<String>,
}

impl AssistantReply {
    fn new(text: String, kind: ReplyKind, effective_model: Option<&str>) -> Self {
        Self {
            text,
            kind,
            effective_model: effective_model.map(str::to_string),
        }
    }
}

/// The financial education assistant
pub struct Assistant {
    extractor: Arc<dyn TextExtractor>,
    completion: CompletionClient,
}

impl Assistant {
    pub fn new(extractor: Arc<dyn TextExtractor>, completion: CompletionClient) -> Self {
        Self {
            extractor,
            completion,
        }
    }

    /// Wire the HTTP completion client and document extractor from config
    pub fn from_config(config: &LicaConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Like [`Assistant::from_config`], also streaming each fragment to `observer`
    pub fn from_config_with_observer(
        config: &LicaConfig,
        observer: FragmentObserver,
    ) -> Result<Self> {
        Self::build(config, Some(observer))
    }

    fn build(config: &LicaConfig, observer: Option<FragmentObserver>) -> Result<Self> {
        if config.llm_service.api_key.is_none() {
            tracing::warn!(
                "No API key configured (set {}); completion requests will be rejected",
                crate::config::API_KEY_ENV
            );
        }

        let backend = Arc::new(NimClient::new(config.llm_service.clone())?);
        let mut completion = CompletionClient::new(backend, ModelRegistry::new());
        if let Some(observer) = observer {
            completion = completion.with_observer(observer);
        }

        let extractor = Arc::new(DocumentExtractor::from_config(config));
        Ok(Self::new(extractor, completion))
    }

    /// Answer a request and return only the display text
    pub async fn process(&self, file: Option<&UploadedFile>, query: &str, model: &str) -> String {
        self.reply(file, query, model).await.text
    }

    /// Answer a request
    ///
    /// A panic anywhere in the pipeline is reported as a processing error.
    pub async fn reply(
        &self,
        file: Option<&UploadedFile>,
        query: &str,
        model: &str,
    ) -> AssistantReply {
        let input = RequestInput { file, query, model };

        match AssertUnwindSafe(self.run(input)).catch_unwind().await {
            Ok(reply) => reply,
            Err(payload) => {
                let cause = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown failure".to_string());
                tracing::error!("Request pipeline failed: {}", cause);
                AssistantReply::new(processing_error_message(&cause), ReplyKind::Failed, None)
            }
        }
    }

    async fn run(&self, input: RequestInput<'_>) -> AssistantReply {
        let (model, document) = match route(&input, self.completion.registry()) {
            Route::Help => {
                return AssistantReply::new(welcome_message(input.model), ReplyKind::Help, None)
            }
            Route::Unsupported => {
                tracing::info!(
                    "Rejected upload {:?}",
                    input.file.map(|f| f.name.as_str()).unwrap_or_default()
                );
                return AssistantReply::new(
                    UNSUPPORTED_FORMAT_MESSAGE.to_string(),
                    ReplyKind::Unsupported,
                    None,
                );
            }
            Route::Proceed { model, document } => (model, document),
        };

        let context = match document {
            Some(doc) => extract_or_empty(self.extractor.as_ref(), doc.path, doc.kind).await,
            None => String::new(),
        };

        let prompt = build_prompt(input.query, &context);

        let (answer, kind) = match self.completion.complete(&prompt, model).await {
            Ok(text) => (text, ReplyKind::Answer),
            Err(e) => (e.user_message(), ReplyKind::CompletionFailed),
        };

        AssistantReply::new(answer_message(model, &answer), kind, Some(model))
    }
}
