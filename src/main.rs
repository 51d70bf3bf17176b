use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use product_agent::catalog::{open_store, ProductStore};
use product_agent::cli::{Cli, Subcommands};
use product_agent::config::{load_env_file, AppConfig, ConfigError};
use product_agent::llm::GeminiClient;
use product_agent::recommend::{RecommendationRequest, Recommender};
use product_agent::{AppError, Orchestrator, USER_QUERY};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let action = Cli::parse().action();
    let env_file = load_env_file();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "loaded env file");
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match action {
        Subcommands::Ask => ask(&config).await,
        Subcommands::Recommend(args) => recommend(&config, args.request()).await,
    }
}

async fn ask(config: &AppConfig) -> ExitCode {
    let mut orchestrator = match connect(config)
        .and_then(|(provider, store)| Orchestrator::with_store(Box::new(provider), store))
    {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("User: {}", USER_QUERY);

    match orchestrator.answer(USER_QUERY).await {
        Ok(answer) => {
            println!("AI: {}", answer);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("\nAPI Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn recommend(config: &AppConfig, request: RecommendationRequest) -> ExitCode {
    let result = match connect(config) {
        Ok((provider, store)) => Recommender::new(Box::new(provider), store).recommend(&request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(recommendation) => {
            println!("{}", recommendation);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn connect(config: &AppConfig) -> Result<(GeminiClient, Arc<dyn ProductStore>), AppError> {
    let store = open_store(&config.store)
        .map_err(|e| ConfigError::InvalidStoreEndpoint(e.to_string()))?;
    let provider = GeminiClient::new(config.api_key.clone(), config.model.clone())?
        .with_base_url(&config.base_url);
    tracing::info!(model = config.model.as_str(), backend = ?config.store.backend(), "starting");
    Ok((provider, store))
}
