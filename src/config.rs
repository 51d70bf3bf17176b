//! Environment-driven application configuration

use std::path::PathBuf;

use crate::catalog::StoreConfig;
use crate::llm::gemini::DEFAULT_BASE_URL;
use crate::llm::GeminiModel;

/// API key for the Generative Language API
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Store endpoint: Supabase project URL or a postgres connection string
pub const STORE_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// Store access key
pub const STORE_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
/// Optional model id override
pub const MODEL_VAR: &str = "GEMINI_MODEL";
/// Optional API host override (proxies, test servers)
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
/// Optional path of the env file to load instead of `.env.local`
pub const ENV_FILE_VAR: &str = "PRODUCT_AGENT_ENV_FILE";

const DEFAULT_ENV_FILE: &str = ".env.local";

/// Configuration errors caught at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY missing.")]
    MissingApiKey,

    #[error("Invalid store endpoint: {0}")]
    InvalidStoreEndpoint(String),
}

/// Everything the binary needs to run one query
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: GeminiModel,
    pub base_url: String,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`
    ///
    /// Only the API key is required. A missing store URL or key is left for
    /// the first search to report.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = lookup(MODEL_VAR)
            .filter(|model| !model.trim().is_empty())
            .map(|model| model.parse::<GeminiModel>().unwrap_or_default())
            .unwrap_or_default();

        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let store = StoreConfig::new(lookup(STORE_URL_VAR), lookup(STORE_KEY_VAR));
        if let Some(endpoint) = &store.endpoint {
            if !has_supported_scheme(endpoint) {
                return Err(ConfigError::InvalidStoreEndpoint(format!(
                    "'{}' is not an http(s) or postgres URL",
                    endpoint
                )));
            }
        }

        Ok(Self {
            api_key,
            model,
            base_url,
            store,
        })
    }
}

fn has_supported_scheme(endpoint: &str) -> bool {
    ["http://", "https://", "postgres://", "postgresql://"]
        .iter()
        .any(|scheme| endpoint.starts_with(scheme))
}

/// Load `.env.local`, or the file named by `PRODUCT_AGENT_ENV_FILE`
///
/// Variables already set in the environment win. A missing file is not an
/// error; returns the path that was loaded.
pub fn load_env_file() -> Option<PathBuf> {
    let path = std::env::var(ENV_FILE_VAR).unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());

    match dotenvy::from_filename(&path) {
        Ok(loaded) => Some(loaded),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(%path, error = %e, "failed to load env file");
            None
        }
    }
}
