//! Command line arguments

use clap::{Args, Parser, Subcommand};

use crate::recommend::RecommendationRequest;

/// Product recommendations from the catalog, chosen by Gemini.
#[derive(Parser)]
#[clap(name = "product_agent", version)]
pub struct Cli {
    /// Subcommands; `ask` when omitted.
    #[clap(subcommand)]
    action: Option<Subcommands>,
}

impl Cli {
    /// Returns the subcommand action.
    #[inline]
    pub fn action(self) -> Subcommands {
        self.action.unwrap_or(Subcommands::Ask)
    }
}

/// CLI subcommands.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Subcommands {
    /// Ask the model for a faucet within a $200 budget, letting it search the catalog.
    Ask,
    /// Recommend products for a project description.
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, PartialEq)]
pub struct RecommendArgs {
    /// What the project needs, in plain words
    #[clap(long, short)]
    description: Option<String>,
    /// Highest acceptable price per product, in dollars
    #[clap(long, short)]
    budget: Option<f64>,
    /// Product category to include, e.g. "Sinks"
    #[clap(long, short)]
    category: Option<String>,
}

impl RecommendArgs {
    pub fn request(self) -> RecommendationRequest {
        RecommendationRequest::new(self.description, self.budget, self.category)
    }
}
