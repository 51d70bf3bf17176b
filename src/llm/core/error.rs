use std::time::Duration;

/// Failures talking to the model
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Rejected or missing API key, or a key without access to the model
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Non-success status without a structured error body
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never reached the API
    #[error("Could not reach the model API: {0}")]
    Connection(String),

    /// The response stream broke off or carried invalid bytes
    #[error("Response stream failed: {0}")]
    Stream(String),

    /// A payload that does not match the API schema
    #[error("Malformed model response: {0}")]
    Decode(String),

    #[error("Rate limited{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// Structured error body, e.g. `NOT_FOUND` for an unknown model
    #[error("{status}: {message}")]
    Api { status: String, message: String },
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(delay) => format!(", retry after {}s", delay.as_secs()),
        None => String::new(),
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => LlmError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None if err.is_connect() || err.is_timeout() => LlmError::Connection(err.to_string()),
            None => LlmError::Stream(err.to_string()),
        }
    }
}
