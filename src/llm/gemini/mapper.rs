//! Translation between the neutral conversation model and Gemini's wire types

use uuid::Uuid;

use crate::llm::core::{
    config::GenerationConfig,
    types::{
        ContentBlock, FinishReason, GenerateRequest, Message, MessageRole, StreamEvent,
        TokenUsage, ToolCall, ToolDeclaration, ToolResult,
    },
};

use super::types::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, GeminiGenerationConfig,
    GenerateContentRequest, GenerateContentResponse, Part, Tool,
};

/// Schema keywords the function declaration schema does not accept
const UNSUPPORTED_SCHEMA_KEYS: &[&str] = &["$schema", "definitions", "$defs"];

const JSON_MIME_TYPE: &str = "application/json";

pub fn to_gemini_request(request: GenerateRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: to_gemini_contents(request.messages),
        system_instruction: request.system.map(|text| Content {
            role: None,
            parts: vec![Part::Text { text }],
        }),
        tools: request
            .tools
            .filter(|tools| !tools.is_empty())
            .map(|tools| {
                vec![Tool {
                    function_declarations: tools.into_iter().map(to_function_declaration).collect(),
                }]
            }),
        generation_config: to_generation_config(&request.config),
    }
}

/// Gemini expects every function response of a turn in one `user` content,
/// so consecutive tool messages are folded together.
fn to_gemini_contents(messages: Vec<Message>) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::with_capacity(messages.len());
    let mut previous_role = None;

    for message in messages {
        let parts = message.content.into_iter().map(to_gemini_part);
        match contents.last_mut() {
            Some(last)
                if message.role == MessageRole::Tool
                    && previous_role == Some(MessageRole::Tool) =>
            {
                last.parts.extend(parts)
            }
            _ => contents.push(Content {
                role: Some(gemini_role(message.role).to_string()),
                parts: parts.collect(),
            }),
        }
        previous_role = Some(message.role);
    }

    contents
}

fn gemini_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::Model => "model",
        MessageRole::User | MessageRole::Tool => "user",
    }
}

fn to_gemini_part(block: ContentBlock) -> Part {
    match block {
        ContentBlock::Text(text) => Part::Text { text },
        ContentBlock::ToolCall(call) => Part::FunctionCall {
            function_call: FunctionCall {
                name: call.name,
                args: call.arguments,
            },
        },
        ContentBlock::ToolResult(result) => Part::FunctionResponse {
            function_response: FunctionResponse {
                response: response_object(&result),
                name: result.name,
            },
        },
    }
}

/// The `response` object of a function response
///
/// Tool output that already is a JSON object passes through. Anything else,
/// plain text or a JSON-encoded string, is wrapped as `{"result": ...}`;
/// failures become `{"error": ...}`.
fn response_object(result: &ToolResult) -> serde_json::Value {
    if result.is_error {
        return serde_json::json!({ "error": result.content });
    }

    match serde_json::from_str::<serde_json::Value>(&result.content) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        Ok(value) => serde_json::json!({ "result": value }),
        Err(_) => serde_json::json!({ "result": result.content }),
    }
}

fn to_function_declaration(tool: ToolDeclaration) -> FunctionDeclaration {
    let mut parameters = tool.parameters;
    if let serde_json::Value::Object(schema) = &mut parameters {
        for key in UNSUPPORTED_SCHEMA_KEYS {
            schema.remove(*key);
        }
    }

    FunctionDeclaration {
        name: tool.name,
        description: tool.description,
        parameters,
    }
}

fn to_generation_config(config: &GenerationConfig) -> GeminiGenerationConfig {
    GeminiGenerationConfig {
        max_output_tokens: config.max_tokens,
        temperature: config.temperature,
        response_mime_type: config.json_output.then(|| JSON_MIME_TYPE.to_string()),
    }
}

/// Events carried by one SSE chunk
///
/// `Finished` is emitted for the chunk that carries a finish reason, or for a
/// prompt the API refused to answer at all.
pub fn from_gemini_response(response: GenerateContentResponse) -> Vec<StreamEvent> {
    let usage = response
        .usage_metadata
        .map(|usage| TokenUsage {
            prompt_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
        })
        .unwrap_or_default();

    let Some(candidate) = response.candidates.into_iter().next() else {
        return response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map(|reason| StreamEvent::Finished {
                reason: map_finish_reason(&reason),
                usage,
            })
            .into_iter()
            .collect();
    };

    let mut events: Vec<StreamEvent> = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| match part {
            Part::Text { text } if !text.is_empty() => Some(StreamEvent::Text(text)),
            Part::FunctionCall { function_call } => Some(StreamEvent::ToolCall(ToolCall {
                id: Uuid::new_v4().to_string(),
                arguments: if function_call.args.is_null() {
                    serde_json::json!({})
                } else {
                    function_call.args
                },
                name: function_call.name,
            })),
            _ => None,
        })
        .collect();

    if let Some(reason) = candidate.finish_reason {
        events.push(StreamEvent::Finished {
            reason: map_finish_reason(&reason),
            usage,
        });
    }

    events
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" => FinishReason::Safety,
        other => FinishReason::Other(other.to_string()),
    }
}
