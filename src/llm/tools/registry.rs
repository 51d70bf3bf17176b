//! Named tools the model may call

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::executor::ToolExecutor;
use crate::llm::core::types::{ToolCall, ToolDeclaration};

/// JSON arguments in, serialized result out
pub type AsyncToolFn =
    Box<dyn Fn(serde_json::Value) -> BoxFuture<'static, Result<String, String>> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

/// A tool's function paired with the declaration the model sees
pub struct ToolRegistration {
    pub function: AsyncToolFn,
    pub declaration: ToolDeclaration,
}

impl ToolRegistration {
    /// Wrap a typed async function
    ///
    /// Arguments that do not deserialize into `Args` fail the call without
    /// running `func`. A successful result is serialized to a JSON string.
    pub fn from_async<F, Args, R, Fut>(declaration: ToolDeclaration, func: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        Fut: Future<Output = Result<R, String>> + Send + 'static,
    {
        let function: AsyncToolFn = Box::new(move |arguments: serde_json::Value| {
            let future = match serde_json::from_value::<Args>(arguments) {
                Ok(args) => func(args),
                Err(e) => {
                    let message = format!("Invalid arguments: {}", e);
                    return Box::pin(async move { Err(message) }) as BoxFuture<'static, _>;
                }
            };

            Box::pin(async move {
                let output = future.await?;
                serde_json::to_string(&output).map_err(|e| format!("Unserializable result: {}", e))
            }) as BoxFuture<'static, _>
        });

        Self {
            function,
            declaration,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }
}

/// Tools by name
///
/// Doubles as the agent's `ToolExecutor`; a call naming an unregistered tool
/// fails with `Unknown tool: <name>`.
#[derive(Default)]
pub struct FunctionRegistry {
    tools: HashMap<String, ToolRegistration>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// `RegistryError::DuplicateTool` if the name is already taken.
    pub fn register(&mut self, registration: ToolRegistration) -> Result<(), RegistryError> {
        let name = registration.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }

        tracing::debug!(tool = %name, "registered tool");
        self.tools.insert(name, registration);
        Ok(())
    }

    /// Declarations sorted by name, so requests are stable across runs
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        let mut declarations: Vec<ToolDeclaration> = self
            .tools
            .values()
            .map(|tool| tool.declaration.clone())
            .collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolExecutor for FunctionRegistry {
    async fn execute(&self, call: &ToolCall) -> Result<String, String> {
        tracing::debug!(call_id = %call.id, tool = %call.name, "executing tool");
        match self.tools.get(&call.name) {
            Some(tool) => (tool.function)(call.arguments.clone()).await,
            None => Err(format!("Unknown tool: {}", call.name)),
        }
    }
}
