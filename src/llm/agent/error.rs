use crate::llm::core::error::LlmError;
use crate::llm::core::types::FinishReason;

/// Why a conversation ended without an answer
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Model call failed: {0}")]
    Llm(#[from] LlmError),

    /// The response stream closed before a finish reason arrived
    #[error("Model stream ended before the turn finished")]
    UnexpectedStreamEnd,

    #[error("Gave up after {0} model calls without a final answer")]
    MaxIterationsReached(usize),

    /// The last turn had neither text nor tool calls, e.g. after `SAFETY`
    #[error("Model finished without an answer (finish reason {0})")]
    EmptyAnswer(FinishReason),
}
