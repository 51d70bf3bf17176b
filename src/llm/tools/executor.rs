//! Seam between the agent loop and whatever runs the tools

use async_trait::async_trait;

use crate::llm::core::types::ToolCall;

/// Runs the function calls a model turn requests
///
/// `Err` is not fatal to the conversation: the message is sent back to the
/// model as the call's error response.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, call: &ToolCall) -> Result<String, String>;
}
