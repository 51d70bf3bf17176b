//! Model layer
//!
//! A provider-neutral conversation model (`core`), the Gemini client that
//! implements it (`gemini`), typed tool registration (`tools`) and the loop
//! that runs requested tools until the model answers (`agent`).

pub mod agent;
pub mod core;
pub mod gemini;
pub mod tools;

pub use self::core::{
    ContentBlock, EventStream, FinishReason, GenerateRequest, GenerationConfig, LlmError,
    LlmProvider, Message, MessageRole, StreamEvent, TokenUsage, ToolCall, ToolDeclaration,
    ToolResult,
};

pub use agent::{Agent, AgentError, AgentEvent};
pub use gemini::{GeminiClient, GeminiModel};
pub use tools::{create_tool_declaration, FunctionRegistry, ToolExecutor, ToolRegistration};
