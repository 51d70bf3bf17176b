//! Tool execution framework
//!
//! This module provides the infrastructure for executing tool calls from LLMs.
//! It includes the `ToolExecutor` trait, schema-derived tool declarations and
//! the `FunctionRegistry` that stores each tool's function with its declaration.

pub mod declaration;
pub mod executor;
pub mod registry;

// Re-export commonly used types
pub use declaration::create_tool_declaration;
pub use executor::ToolExecutor;
pub use registry::{FunctionRegistry, RegistryError, ToolRegistration};
