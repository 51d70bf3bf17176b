use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{GenerateRequest, StreamEvent},
};

/// Events of one model turn, in arrival order
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// A model the agent can drive
///
/// Implementations translate the request to their wire format and stream the
/// answer back. A well-formed stream ends with exactly one
/// `StreamEvent::Finished`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Start one model turn
    ///
    /// Errors returned here happened before any output arrived (rejected key,
    /// unreachable host, non-success status).
    async fn stream_generate(&self, request: GenerateRequest) -> Result<EventStream, LlmError>;
}
