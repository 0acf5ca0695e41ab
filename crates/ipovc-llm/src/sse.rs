//! Server-sent-event parser for streamed chat completions
//!
//! Turns the raw `reqwest` byte stream into content deltas. Handles
//! `data: [DONE]`, lines split across network chunks, and multi-byte UTF-8
//! characters split across chunks (common with Chinese output).

use crate::LlmError;
use bytes::Bytes;
use futures::stream::Stream;
use serde::Deserialize;
use std::pin::Pin;
use std::task::{Context, Poll};

/// One parsed event from a streamed completion
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A content fragment (may be empty for role-only deltas)
    Delta(String),

    /// The server signalled completion
    Done,
}

#[derive(Debug, Deserialize)]
struct StreamChunkRaw {
    #[serde(default)]
    choices: Vec<StreamChoiceRaw>,
}

#[derive(Debug, Deserialize)]
struct StreamChoiceRaw {
    #[serde(default)]
    delta: Option<DeltaRaw>,
}

#[derive(Debug, Deserialize)]
struct DeltaRaw {
    #[serde(default)]
    content: Option<String>,
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Stream adapter from SSE bytes to [`StreamEvent`]s
pub struct ChatCompletionStream {
    inner: ByteStream,
    pending: Vec<u8>,
    buffer: String,
}

impl ChatCompletionStream {
    pub(crate) fn new(
        byte_stream: impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            pending: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Move the longest valid UTF-8 prefix of `pending` into `buffer`
    fn absorb(&mut self, bytes: &[u8]) -> Result<(), LlmError> {
        self.pending.extend_from_slice(bytes);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                self.buffer.push_str(text);
                self.pending.clear();
                Ok(())
            }
            Err(e) if e.error_len().is_none() => {
                // Incomplete trailing character; keep it for the next chunk.
                let valid = e.valid_up_to();
                let text = std::str::from_utf8(&self.pending[..valid])
                    .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
                self.buffer.push_str(text);
                self.pending.drain(..valid);
                Ok(())
            }
            Err(e) => Err(LlmError::InvalidResponse(format!(
                "Invalid UTF-8 in stream: {}",
                e
            ))),
        }
    }
}

impl Stream for ChatCompletionStream {
    type Item = Result<StreamEvent, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(event) = try_parse_line(&mut this.buffer) {
                return Poll::Ready(Some(event));
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    if let Err(e) = this.absorb(&bytes) {
                        return Poll::Ready(Some(Err(e)));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(LlmError::Communication(format!(
                        "Stream interrupted: {}",
                        e
                    )))));
                }
                Poll::Ready(None) => {
                    // Flush a final line that had no trailing newline.
                    if !this.buffer.trim().is_empty() {
                        this.buffer.push('\n');
                        if let Some(event) = try_parse_line(&mut this.buffer) {
                            return Poll::Ready(Some(event));
                        }
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Pop and parse the next complete `data:` line from the buffer
fn try_parse_line(buffer: &mut String) -> Option<Result<StreamEvent, LlmError>> {
    loop {
        let newline_pos = buffer.find('\n')?;
        let line = buffer[..newline_pos].trim().to_string();
        buffer.drain(..=newline_pos);

        if line.is_empty() {
            continue;
        }

        // Skip non-data fields (event:, id:, retry:, comments)
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        let data = data.trim();

        if data == "[DONE]" {
            return Some(Ok(StreamEvent::Done));
        }

        return Some(
            serde_json::from_str::<StreamChunkRaw>(data)
                .map(|raw| {
                    let delta = raw
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.delta)
                        .and_then(|d| d.content)
                        .unwrap_or_default();
                    StreamEvent::Delta(delta)
                })
                .map_err(|e| {
                    let preview: String = data.chars().take(200).collect();
                    LlmError::InvalidResponse(format!(
                        "Failed to parse stream chunk: {} (data: {})",
                        e, preview
                    ))
                }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn sse(chunks: Vec<Vec<u8>>) -> ChatCompletionStream {
        let items: Vec<Result<Bytes, reqwest::Error>> =
            chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
        ChatCompletionStream::new(futures::stream::iter(items))
    }

    async fn collect(mut stream: ChatCompletionStream) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            events.push(event.unwrap());
        }
        events
    }

    #[tokio::test]
    async fn test_parse_deltas_and_done() {
        let stream = sse(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"{\\\"a\\\"\"}}]}\n\n".to_vec(),
            b"data: {\"choices\":[{\"delta\":{\"content\":\": 1}\"}}]}\n\n".to_vec(),
            b"data: [DONE]\n\n".to_vec(),
        ]);

        let events = collect(stream).await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("{\"a\"".to_string()),
                StreamEvent::Delta(": 1}".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_line_split_across_chunks() {
        let stream = sse(vec![
            b"data: {\"choices\":[{\"del".to_vec(),
            b"ta\":{\"content\":\"hi\"}}]}\n".to_vec(),
            b"data: [DONE]\n".to_vec(),
        ]);

        let events = collect(stream).await;
        assert_eq!(events[0], StreamEvent::Delta("hi".to_string()));
        assert_eq!(events[1], StreamEvent::Done);
    }

    #[tokio::test]
    async fn test_multibyte_char_split_across_chunks() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"创投\"}}]}\n".as_bytes();
        // Split inside the first Chinese character
        let split = line.iter().position(|b| *b >= 0x80).unwrap() + 1;
        let stream = sse(vec![line[..split].to_vec(), line[split..].to_vec()]);

        let events = collect(stream).await;
        assert_eq!(events, vec![StreamEvent::Delta("创投".to_string())]);
    }

    #[tokio::test]
    async fn test_role_only_delta_is_empty() {
        let stream = sse(vec![
            b"data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n".to_vec(),
        ]);
        let events = collect(stream).await;
        assert_eq!(events, vec![StreamEvent::Delta(String::new())]);
    }

    #[tokio::test]
    async fn test_non_data_lines_skipped() {
        let stream = sse(vec![b": keep-alive\nevent: message\ndata: [DONE]\n".to_vec()]);
        let events = collect(stream).await;
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[tokio::test]
    async fn test_trailing_line_without_newline() {
        let stream = sse(vec![b"data: [DONE]".to_vec()]);
        let events = collect(stream).await;
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_error() {
        let mut stream = sse(vec![b"data: {not json}\n".to_vec()]);
        let event = stream.next().await.unwrap();
        assert!(matches!(event, Err(LlmError::InvalidResponse(_))));
    }
}
