//! Automatic function-calling loop
//!
//! The agent keeps the conversation history, calls the provider, executes any
//! tool calls the model requests and feeds their results back, until the model
//! answers with text only. Callers either consume the event stream from `run`
//! or let `run_to_completion` drain it and hand back the final answer.

mod error;

pub use error::AgentError;

use crate::llm::core::{
    config::GenerationConfig,
    provider::LlmProvider,
    types::{
        FinishReason, GenerateRequest, Message, StreamEvent, ToolCall, ToolDeclaration,
        ToolResult,
    },
};
use crate::llm::tools::executor::ToolExecutor;
use async_stream::stream;
use futures::stream::Stream;
use futures::StreamExt;
use pin_utils::pin_mut;
use std::pin::Pin;

/// Iteration cap used by `Agent::new`
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

pub type AgentStream<'a> = Pin<Box<dyn Stream<Item = Result<AgentEvent, AgentError>> + Send + 'a>>;

/// Progress of one `run`
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// About to call the model, counting from 1
    TurnStarted { iteration: usize },

    /// Forwarded from the provider stream
    Model(StreamEvent),

    ToolStarted { call: ToolCall },

    ToolCompleted {
        call_id: String,
        name: String,
        output: String,
    },

    /// The error is sent back to the model; the run goes on
    ToolFailed {
        call_id: String,
        name: String,
        error: String,
    },

    /// Always the last event of a successful run
    Completed { answer: String },
}

/// Conversation with a model that may call tools
pub struct Agent {
    provider: Box<dyn LlmProvider>,
    tool_executor: Box<dyn ToolExecutor>,
    tool_declarations: Vec<ToolDeclaration>,
    messages: Vec<Message>,
    config: GenerationConfig,
    system: Option<String>,
    max_iterations: usize,
}

impl Agent {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        tool_executor: Box<dyn ToolExecutor>,
        tool_declarations: Vec<ToolDeclaration>,
        config: GenerationConfig,
        system: Option<String>,
    ) -> Self {
        Self {
            provider,
            tool_executor,
            tool_declarations,
            messages: Vec::new(),
            config,
            system,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Cap the number of model calls per `run`
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Append `user_message` to the history and start the loop
    ///
    /// Nothing is sent until the returned stream is polled. A turn that
    /// requests tools is answered with one tool message holding every result,
    /// in call order, before the model is called again.
    pub fn run(&mut self, user_message: impl Into<String>) -> AgentStream<'_> {
        self.messages.push(Message::user(user_message));
        Box::pin(self.agent_stream())
    }

    /// Run the loop for one user message and return the model's final text
    ///
    /// Tool failures are reported to the model, not returned; provider errors,
    /// an empty final turn and the iteration cap end the run early.
    pub async fn run_to_completion(
        &mut self,
        user_message: impl Into<String>,
    ) -> Result<String, AgentError> {
        let mut events = self.run(user_message);
        let mut answer = None;

        while let Some(event) = events.next().await {
            match event? {
                AgentEvent::TurnStarted { iteration } => {
                    tracing::debug!(iteration, "calling model");
                }
                AgentEvent::Model(StreamEvent::Finished { reason, usage }) => {
                    tracing::debug!(%reason, total_tokens = usage.total_tokens, "model turn finished");
                }
                AgentEvent::ToolStarted { call } => {
                    tracing::info!(tool = %call.name, arguments = %call.arguments, "model requested tool");
                }
                AgentEvent::ToolFailed { name, error, .. } => {
                    tracing::warn!(tool = %name, %error, "tool execution failed");
                }
                AgentEvent::Completed { answer: text } => answer = Some(text),
                _ => {}
            }
        }

        answer.ok_or(AgentError::UnexpectedStreamEnd)
    }

    /// Full conversation history
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn agent_stream(&mut self) -> impl Stream<Item = Result<AgentEvent, AgentError>> + Send + '_ {
        stream! {
            let mut iteration = 0;

            loop {
                iteration += 1;
                if iteration > self.max_iterations {
                    yield Err(AgentError::MaxIterationsReached(self.max_iterations));
                    return;
                }
                yield Ok(AgentEvent::TurnStarted { iteration });

                let request = GenerateRequest {
                    messages: self.messages.clone(),
                    tools: Some(self.tool_declarations.clone()),
                    config: self.config.clone(),
                    system: self.system.clone(),
                };

                let model_stream = match self.provider.stream_generate(request).await {
                    Ok(s) => s,
                    Err(e) => {
                        yield Err(AgentError::Llm(e));
                        return;
                    }
                };
                pin_mut!(model_stream);

                let mut text = String::new();
                let mut calls: Vec<ToolCall> = Vec::new();
                let mut finish: Option<FinishReason> = None;

                while let Some(event) = model_stream.next().await {
                    let event = match event {
                        Ok(event) => event,
                        Err(e) => {
                            yield Err(AgentError::Llm(e));
                            return;
                        }
                    };

                    match &event {
                        StreamEvent::Text(piece) => text.push_str(piece),
                        StreamEvent::ToolCall(call) => calls.push(call.clone()),
                        StreamEvent::Finished { reason, .. } => finish = Some(reason.clone()),
                    }
                    yield Ok(AgentEvent::Model(event));
                }

                let reason = match finish {
                    Some(reason) => reason,
                    None => {
                        yield Err(AgentError::UnexpectedStreamEnd);
                        return;
                    }
                };

                if calls.is_empty() {
                    if text.is_empty() && reason != FinishReason::Stop {
                        yield Err(AgentError::EmptyAnswer(reason));
                        return;
                    }
                    if reason != FinishReason::Stop {
                        tracing::warn!(%reason, "answer may be truncated");
                    }

                    self.messages.push(Message::model_turn(text.clone(), vec![]));
                    yield Ok(AgentEvent::Completed { answer: text });
                    return;
                }

                self.messages.push(Message::model_turn(text, calls.clone()));

                let mut results = Vec::with_capacity(calls.len());
                for call in &calls {
                    yield Ok(AgentEvent::ToolStarted { call: call.clone() });

                    match self.tool_executor.execute(call).await {
                        Ok(output) => {
                            yield Ok(AgentEvent::ToolCompleted {
                                call_id: call.id.clone(),
                                name: call.name.clone(),
                                output: output.clone(),
                            });
                            results.push(ToolResult::success(call, output));
                        }
                        Err(error) => {
                            yield Ok(AgentEvent::ToolFailed {
                                call_id: call.id.clone(),
                                name: call.name.clone(),
                                error: error.clone(),
                            });
                            results.push(ToolResult::failure(call, error));
                        }
                    }
                }

                self.messages.push(Message::tool_results(results));
            }
        }
    }
}
