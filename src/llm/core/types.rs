//! Conversation and stream types shared by the agent and the Gemini client
//!
//! Gemini delivers each function call whole, inside a single chunk, so a model
//! turn streams as text pieces and complete tool calls, closed by exactly one
//! [`StreamEvent::Finished`].

use std::fmt;

use super::config::GenerationConfig;

/// One call to the model
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub messages: Vec<Message>,
    /// `None` or an empty list: the model can only answer with text
    pub tools: Option<Vec<ToolDeclaration>>,
    pub config: GenerationConfig,
    pub system: Option<String>,
}

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Model,
    /// Results of the calls requested by the preceding model turn
    Tool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// A model turn: its text, if any, followed by the calls it requested
    pub fn model_turn(text: String, calls: Vec<ToolCall>) -> Self {
        let mut content = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            content.push(ContentBlock::Text(text));
        }
        content.extend(calls.into_iter().map(ContentBlock::ToolCall));

        Self {
            role: MessageRole::Model,
            content,
        }
    }

    /// The results of every call made in one model turn, in call order
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: results.into_iter().map(ContentBlock::ToolResult).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolCall(ToolCall),
    ToolResult(ToolResult),
}

/// A function call requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Generated locally; Gemini does not number its calls
    pub id: String,
    pub name: String,
    /// Always a JSON object
    pub arguments: serde_json::Value,
}

/// Output of one executed tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub call_id: String,
    /// Name of the called function, which Gemini pairs responses by
    pub name: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            name: call.name.clone(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn failure(call: &ToolCall, error: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::success(call, error)
        }
    }
}

/// A function the model may call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema of the argument object
    pub parameters: serde_json::Value,
}

/// Incremental output of one model turn
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Text(String),
    ToolCall(ToolCall),
    Finished {
        reason: FinishReason,
        usage: TokenUsage,
    },
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    /// Any other reason, as the API spelled it
    Other(String),
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => f.write_str("STOP"),
            FinishReason::MaxTokens => f.write_str("MAX_TOKENS"),
            FinishReason::Safety => f.write_str("SAFETY"),
            FinishReason::Other(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub output_tokens: u32,
    /// Includes thinking tokens, so it can exceed prompt plus output
    pub total_tokens: u32,
}
