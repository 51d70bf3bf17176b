//! Server-sent events framing for `alt=sse` responses
//!
//! Every event is a single `data: <json>` line holding one
//! `GenerateContentResponse`. Other SSE fields and blank separator lines are
//! skipped.

use async_stream::stream;
use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use pin_utils::pin_mut;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::GenerateContentResponse;

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, LlmError>> + Send>>;

/// Reassembles lines from arbitrarily split byte chunks
///
/// Bytes are buffered raw, so a multi-byte character cut in half by the
/// transport is decoded only once both halves have arrived.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Append `chunk` and decode every line it completes
    fn push(&mut self, chunk: &[u8]) -> Vec<Result<GenerateContentResponse, LlmError>> {
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(end) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            events.extend(decode_line(&line));
        }
        events
    }

    /// Decode a last line the server did not terminate
    fn finish(&mut self) -> Option<Result<GenerateContentResponse, LlmError>> {
        let rest = std::mem::take(&mut self.pending);
        decode_line(&rest)
    }
}

fn decode_line(raw: &[u8]) -> Option<Result<GenerateContentResponse, LlmError>> {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line.trim(),
        Err(e) => return Some(Err(LlmError::Stream(format!("invalid UTF-8 in event: {}", e)))),
    };

    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() {
        return None;
    }
    tracing::trace!(bytes = data.len(), "gemini sse event");

    Some(
        serde_json::from_str(data)
            .map_err(|e| LlmError::Decode(format!("{} in event: {}", e, data))),
    )
}

/// Turn a response body into decoded chunks
///
/// A transport error is yielded once and ends the stream.
pub fn parse_sse_stream<S>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    Box::pin(stream! {
        let mut lines = LineBuffer::default();
        pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            match chunk {
                Ok(chunk) => {
                    for event in lines.push(&chunk) {
                        yield event;
                    }
                }
                Err(e) => {
                    yield Err(LlmError::Stream(e.to_string()));
                    return;
                }
            }
        }

        if let Some(event) = lines.finish() {
            yield event;
        }
    })
}
