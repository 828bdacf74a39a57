//! LLM integration
//!
//! Provides:
//! - Streaming chat completions against OpenAI-compatible services
//! - Server-sent event decoding and fragment accumulation
//! - Model allow-list enforcement before any request is sent

mod client;
mod completion;
mod stream;

pub use client::{ChatMessage, CompletionBackend, DecodingParams, NimClient};
pub use completion::{CompletionClient, FragmentObserver};
pub use stream::{
    accumulate_fragments, accumulate_with, parse_chunk, FragmentStream, SseDecoder, SseEvent,
};
