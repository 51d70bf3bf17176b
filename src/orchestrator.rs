//! Runs one user request through the model with the catalog search available

use std::sync::Arc;

use crate::catalog::ProductStore;
use crate::error::AppError;
use crate::llm::{Agent, FunctionRegistry, GenerationConfig, LlmProvider};
use crate::search_tool::SearchTool;

/// The request the binary sends
pub const USER_QUERY: &str = "I want to renovate my bathroom and begin by getting a new faucet. \
     What is a faucet within my budget of 200?";

/// Drives the conversation for the product agent
pub struct Orchestrator {
    agent: Agent,
}

impl Orchestrator {
    /// Create an orchestrator exposing every declared tool in `registry`
    pub fn new(provider: Box<dyn LlmProvider>, registry: FunctionRegistry) -> Self {
        let declarations = registry.declarations();
        tracing::debug!(tools = registry.len(), "building agent");

        Self {
            agent: Agent::new(
                provider,
                Box::new(registry),
                declarations,
                GenerationConfig::default(),
                None,
            ),
        }
    }

    /// Create an orchestrator with the catalog search tool backed by `store`
    pub fn with_store(
        provider: Box<dyn LlmProvider>,
        store: Arc<dyn ProductStore>,
    ) -> Result<Self, AppError> {
        let mut registry = FunctionRegistry::new();
        registry.register(Arc::new(SearchTool::new(store)).registration())?;
        Ok(Self::new(provider, registry))
    }

    /// Send `query` and return the model's final text
    ///
    /// Tool calls requested along the way are executed automatically.
    pub async fn answer(&mut self, query: &str) -> Result<String, AppError> {
        let answer = self.agent.run_to_completion(query).await?;
        tracing::info!(messages = self.agent.messages().len(), "conversation complete");
        Ok(answer)
    }
}
