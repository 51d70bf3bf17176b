//! Provider-neutral half of the model layer
//!
//! The agent and the tools only see these types; `llm::gemini` translates them
//! to and from the Generative Language API.

pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use config::{GenerationConfig, DEFAULT_MAX_TOKENS};
pub use error::LlmError;
pub use provider::{EventStream, LlmProvider};
pub use types::{
    ContentBlock, FinishReason, GenerateRequest, Message, MessageRole, StreamEvent, TokenUsage,
    ToolCall, ToolDeclaration, ToolResult,
};
