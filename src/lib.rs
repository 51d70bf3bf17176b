//! Product recommendation agent
//!
//! Sends a shopper's request to Gemini with a catalog search tool attached.
//! The model calls `search_products` when it needs real products, and the
//! search runs against a Supabase (PostgREST) or PostgreSQL product table.
//! The `recommend` flow instead pre-selects candidates from a project
//! description and asks the model to rank them.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod recommend;
pub mod search_tool;

pub use config::{AppConfig, ConfigError};
pub use error::AppError;
pub use orchestrator::{Orchestrator, USER_QUERY};
pub use recommend::{Recommendation, RecommendationRequest, Recommender};
pub use search_tool::{SearchArgs, SearchTool};
