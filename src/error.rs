use crate::catalog::StoreError;
use crate::config::ConfigError;
use crate::llm::tools::RegistryError;
use crate::llm::{AgentError, LlmError};

/// Errors that end a run of the application
///
/// Store faults during a conversation never appear here: the search tool turns
/// them into text for the model. Only the recommendation lookup, which runs
/// before any model call, reports them.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid or missing configuration, caught before any remote call
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A recommendation request with neither description nor category
    #[error("Description or category is required")]
    MissingCriteria,

    #[error("Database query failed: {0}")]
    CatalogQuery(#[from] StoreError),

    /// The model call, or the conversation around it, failed
    #[error("{0}")]
    RemoteCall(String),
}

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        AppError::RemoteCall(err.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::RemoteCall(err.to_string())
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::RemoteCall(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display_is_transparent() {
        let err = AppError::from(ConfigError::MissingApiKey);
        assert_eq!(err.to_string(), "GOOGLE_API_KEY missing.");
    }

    #[test]
    fn test_agent_error_becomes_remote_call() {
        let err = AppError::from(AgentError::Llm(LlmError::Authentication(
            "API key not valid".to_string(),
        )));
        assert!(matches!(&err, AppError::RemoteCall(msg) if msg.contains("API key not valid")));
    }

    #[test]
    fn test_catalog_query_display() {
        let err = AppError::from(StoreError::Connection("refused".to_string()));
        assert_eq!(err.to_string(), "Database query failed: Connection error: refused");
    }
}
