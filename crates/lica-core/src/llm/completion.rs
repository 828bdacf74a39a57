//! Model-checked completion entry point

use super::client::{ChatMessage, CompletionBackend, DecodingParams};
use super::stream::accumulate_with;
use crate::error::Result;
use crate::models::ModelRegistry;
use std::sync::Arc;
use std::time::Instant;

/// Callback receiving each fragment as it streams in
pub type FragmentObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// Sends one prompt to a registered model and collects the streamed answer
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
    registry: ModelRegistry,
    params: DecodingParams,
    observer: Option<FragmentObserver>,
}

impl CompletionClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, registry: ModelRegistry) -> Self {
        Self {
            backend,
            registry,
            params: DecodingParams::default(),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: FragmentObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Complete `prompt` with `model_id`
    ///
    /// Unregistered models fail with `InvalidModel` before any request is made.
    pub async fn complete(&self, prompt: &str, model_id: &str) -> Result<String> {
        let spec = self.registry.resolve(model_id)?;
        let start = Instant::now();

        tracing::debug!("Requesting completion from {} ({} prompt chars)", spec.id, prompt.len());

        let result = async {
            let stream = self
                .backend
                .stream_chat(spec.id, vec![ChatMessage::user(prompt)], &self.params)
                .await?;

            let mut fragments = 0usize;
            let text = accumulate_with(stream, |fragment| {
                fragments += 1;
                if let Some(ref observer) = self.observer {
                    observer(fragment);
                }
            })
            .await?;
            Ok::<_, crate::error::LicaError>((text, fragments))
        }
        .await;

        match result {
            Ok((text, fragments)) => {
                tracing::debug!(
                    "Completion from {} finished: {} fragments, {} chars in {}ms",
                    spec.id,
                    fragments,
                    text.len(),
                    start.elapsed().as_millis()
                );
                Ok(text)
            }
            Err(e) => {
                tracing::warn!("Error getting model response from {}: {}", spec.id, e);
                Err(e)
            }
        }
    }
}
