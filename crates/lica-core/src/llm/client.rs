//! HTTP client for OpenAI-compatible streaming chat completions

use super::stream::{parse_chunk, FragmentStream, SseDecoder, SseEvent};
use crate::config::LLMServiceConfig;
use crate::error::{LicaError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Trait for streaming chat-completion backends
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Open a streaming completion and return its fragments
    async fn stream_chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: &DecodingParams,
    ) -> Result<FragmentStream>;
}

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling settings sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.7,
            max_tokens: 1024,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

/// Client for NVIDIA NIM and other OpenAI-compatible endpoints
pub struct NimClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
}

impl NimClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(LicaError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for NimClient {
    async fn stream_chat(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        params: &DecodingParams,
    ) -> Result<FragmentStream> {
        let request = ChatRequest {
            model,
            messages,
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stream: true,
        };

        let mut req = self
            .http_client
            .post(self.completions_url())
            .header("Accept", "text/event-stream")
            .json(&request);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LicaError::ExternalError(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        Ok(decode_event_stream(response.bytes_stream()))
    }
}

struct DecodeState<S> {
    bytes: S,
    decoder: SseDecoder,
    pending: VecDeque<Result<Option<String>>>,
    finished: bool,
}

impl<S> DecodeState<S> {
    /// Queue parsed events; returns true once `[DONE]` is seen
    fn enqueue(&mut self, events: impl IntoIterator<Item = SseEvent>) -> bool {
        for event in events {
            match event {
                SseEvent::Data(data) => self.pending.push_back(parse_chunk(&data)),
                SseEvent::Done => return true,
            }
        }
        false
    }
}

/// Turn a raw SSE byte stream into completion fragments
pub(crate) fn decode_event_stream<S, B>(bytes: S) -> FragmentStream
where
    S: futures::Stream<Item = std::result::Result<B, reqwest::Error>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    Box::pin(futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(chunk.as_ref());
                    state.finished = state.enqueue(events);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.pending.push_back(Err(LicaError::Http(e)));
                }
                None => {
                    let tail = state.decoder.finish();
                    state.enqueue(tail);
                    state.finished = true;
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stream::accumulate_fragments;

    fn byte_stream(
        chunks: Vec<&'static str>,
    ) -> impl futures::Stream<Item = std::result::Result<&'static [u8], reqwest::Error>> + Send + Unpin
    {
        futures::stream::iter(chunks.into_iter().map(|c| Ok(c.as_bytes())))
    }

    #[test]
    fn test_default_decoding_params() {
        let params = DecodingParams::default();
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.top_p, 0.7);
        assert_eq!(params.max_tokens, 1024);
    }

    #[test]
    fn test_request_body_shape() {
        let params = DecodingParams::default();
        let body = ChatRequest {
            model: "meta/llama-3.1-405b-instruct",
            messages: vec![ChatMessage::user("hello")],
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stream: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "meta/llama-3.1-405b-instruct");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn test_completions_url() {
        let config = LLMServiceConfig {
            url: "http://localhost:8000/v1/".to_string(),
            ..Default::default()
        };
        let client = NimClient::new(config).unwrap();
        assert_eq!(
            client.completions_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_decode_stream_across_chunks() {
        let chunks = vec![
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Bud\"}}]}\n\ndata: {\"choi",
            "ces\":[{\"delta\":{\"content\":\"get\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
        ];
        let text = accumulate_fragments(decode_event_stream(byte_stream(chunks)))
            .await
            .unwrap();
        assert_eq!(text, "Budget");
    }

    #[tokio::test]
    async fn test_decode_stream_without_done_marker() {
        let chunks = vec!["data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}"];
        let text = accumulate_fragments(decode_event_stream(byte_stream(chunks)))
            .await
            .unwrap();
        assert_eq!(text, "ok");
    }
}
