//! Server-sent event decoding and fragment accumulation

use crate::error::{LicaError, Result};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::pin::Pin;

/// Stream of streamed completion fragments; `None` marks a chunk without content
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Option<String>>> + Send>>;

/// One complete SSE line of interest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Data(String),
    Done,
}

/// Reassembles SSE lines across arbitrary byte chunk boundaries
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that was not newline-terminated
    pub fn finish(&mut self) -> Option<SseEvent> {
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line)
    }
}

fn parse_line(raw: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\r', '\n']);
    let data = line.strip_prefix("data:")?.trim_start();

    if data == "[DONE]" {
        Some(SseEvent::Done)
    } else if data.is_empty() {
        None
    } else {
        Some(SseEvent::Data(data.to_string()))
    }
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Option<ChunkDelta>,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Pull `choices[0].delta.content` out of one chunk payload
pub fn parse_chunk(data: &str) -> Result<Option<String>> {
    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| LicaError::Parse(format!("Malformed completion chunk: {}", e)))?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content))
}

/// Concatenate all non-null fragments in arrival order
pub async fn accumulate_fragments(stream: FragmentStream) -> Result<String> {
    accumulate_with(stream, |_| {}).await
}

/// Like [`accumulate_fragments`], also handing each non-empty fragment to `on_fragment`
pub async fn accumulate_with<F>(mut stream: FragmentStream, mut on_fragment: F) -> Result<String>
where
    F: FnMut(&str),
{
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        if let Some(content) = fragment? {
            if !content.is_empty() {
                on_fragment(&content);
            }
            text.push_str(&content);
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(items: Vec<Option<&'static str>>) -> FragmentStream {
        Box::pin(futures::stream::iter(
            items.into_iter().map(|i| Ok(i.map(str::to_string))),
        ))
    }

    #[tokio::test]
    async fn test_accumulate_skips_null_fragments() {
        let stream = fragments(vec![Some("A"), Some(""), Some("B"), None, Some("C")]);
        assert_eq!(accumulate_fragments(stream).await.unwrap(), "ABC");
    }

    #[tokio::test]
    async fn test_accumulate_observer_sees_non_empty_fragments() {
        let stream = fragments(vec![Some("Save "), None, Some(""), Some("early")]);
        let mut seen = Vec::new();
        let text = accumulate_with(stream, |f| seen.push(f.to_string()))
            .await
            .unwrap();
        assert_eq!(text, "Save early");
        assert_eq!(seen, vec!["Save ", "early"]);
    }

    #[tokio::test]
    async fn test_accumulate_propagates_stream_error() {
        let stream: FragmentStream = Box::pin(futures::stream::iter(vec![
            Ok(Some("partial".to_string())),
            Err(LicaError::ExternalError("connection reset".to_string())),
        ]));
        let err = accumulate_fragments(stream).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_decoder_handles_split_lines() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        let events = decoder.push(b":1}\n\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![SseEvent::Data("{\"a\":1}".to_string()), SseEvent::Done]
        );
    }

    #[test]
    fn test_decoder_handles_split_utf8() {
        let mut decoder = SseDecoder::new();
        let line = "data: {\"c\":\"€\"}\n".as_bytes();
        let (head, tail) = line.split_at(14);
        assert!(decoder.push(head).is_empty());
        assert_eq!(
            decoder.push(tail),
            vec![SseEvent::Data("{\"c\":\"€\"}".to_string())]
        );
    }

    #[test]
    fn test_decoder_ignores_comments_and_crlf() {
        let mut decoder = SseDecoder::new();
        let events = decoder.push(b": keep-alive\r\nevent: message\r\ndata: x\r\n");
        assert_eq!(events, vec![SseEvent::Data("x".to_string())]);
    }

    #[test]
    fn test_decoder_finish_flushes_tail() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: [DONE]").is_empty());
        assert_eq!(decoder.finish(), Some(SseEvent::Done));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_parse_chunk_content_and_null() {
        let with = r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":"Hi"}}]}"#;
        let null = r#"{"choices":[{"index":0,"delta":{"content":null},"finish_reason":"stop"}]}"#;
        let empty = r#"{"choices":[]}"#;
        assert_eq!(parse_chunk(with).unwrap(), Some("Hi".to_string()));
        assert_eq!(parse_chunk(null).unwrap(), None);
        assert_eq!(parse_chunk(empty).unwrap(), None);
        assert!(parse_chunk("not json").is_err());
    }
}
