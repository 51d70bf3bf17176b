//! Project recommendations: catalog candidates ranked by the model
//!
//! The shopper describes a project, optionally with a budget and a category.
//! Keywords from the description select up to `CANDIDATE_LIMIT` cheap
//! candidates, and the model picks the most relevant ones, with a reason for
//! each, answering in JSON. When the model call or its answer fails, the
//! cheapest candidates are shown instead.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::catalog::{Candidate, CandidateQuery, ProductStore};
use crate::error::AppError;
use crate::llm::{Agent, FunctionRegistry, GenerationConfig, LlmProvider};
use crate::search_tool::format_product;

/// Most products a recommendation lists
pub const MAX_RECOMMENDATIONS: usize = 6;

/// Summary when no candidate matches
pub const NO_CANDIDATES: &str =
    "No products found matching your criteria. Try adjusting your budget or category.";

const DEFAULT_SUMMARY: &str = "Selected products based on your project requirements.";

const TEMPERATURE: f32 = 0.7;

/// Words that say nothing about the product
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "shall", "can",
    "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by", "from",
    "as", "into", "through", "during", "before", "after", "above", "below", "between", "out",
    "off", "over", "under", "again", "further", "then", "once", "here", "there", "when",
    "where", "why", "how", "all", "each", "every", "both", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "just", "because", "but", "and", "or", "if", "while", "although", "though", "until",
    "unless", "since", "what", "which", "who", "whom", "this", "that", "these", "those",
    "i", "me", "my", "myself", "we", "our", "ours", "you", "your", "yours", "he", "him", "his",
    "she", "her", "hers", "it", "its", "they", "them", "their", "get", "give", "want", "like",
    "look", "find", "recommendation", "recommend", "suggest", "suggestion", "please",
    "help", "looking", "something", "anything", "within", "budget", "price", "cost",
    "about", "around", "approximately", "new", "good", "best", "cheap", "expensive",
];

/// Search keywords in a free-text description
///
/// Lowercased ASCII words longer than two letters that are not stop words,
/// first occurrence order. Digits and punctuation separate words.
pub fn extract_search_terms(text: &str) -> Vec<String> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
        .collect();

    let mut seen = HashSet::new();
    normalized
        .split_whitespace()
        .filter(|word| word.len() > 2 && !stop_words.contains(word))
        .filter(|word| seen.insert(word.to_string()))
        .map(str::to_string)
        .collect()
}

/// What the shopper asked for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationRequest {
    pub description: Option<String>,
    /// Inclusive ceiling; zero or less means no budget
    pub budget: Option<f64>,
    pub category: Option<String>,
}

impl RecommendationRequest {
    /// Blank strings and non-positive budgets count as absent
    pub fn new(description: Option<String>, budget: Option<f64>, category: Option<String>) -> Self {
        let present = |text: Option<String>| {
            text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
        };
        Self {
            description: present(description),
            budget: budget.filter(|b| *b > 0.0),
            category: present(category),
        }
    }

    /// # Errors
    ///
    /// `AppError::MissingCriteria` without a description or a category.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.description.is_none() && self.category.is_none() {
            return Err(AppError::MissingCriteria);
        }
        Ok(())
    }

    /// The category, verbatim, followed by the description's keywords
    pub fn candidate_query(&self) -> CandidateQuery {
        let mut terms: Vec<String> = self.category.iter().cloned().collect();
        terms.extend(extract_search_terms(self.description.as_deref().unwrap_or_default()));
        CandidateQuery {
            terms,
            budget: self.budget,
        }
    }

    fn prompt(&self, candidates: &[Candidate]) -> String {
        let product_list = candidates
            .iter()
            .enumerate()
            .map(|(idx, candidate)| {
                format!(
                    "{}. [ID: {}] {} | ${} | Category: {}",
                    idx,
                    candidate.id,
                    candidate.product.name.as_deref().unwrap_or("Unknown Product"),
                    candidate
                        .product
                        .price
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    candidate.label.as_deref().unwrap_or("Uncategorized"),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are a procurement assistant for industrial/construction projects.\n\
             \n\
             Project Description: {description}\n\
             Budget: ${budget}\n\
             Category: {category}\n\
             \n\
             Available products from our catalog:\n\
             {product_list}\n\
             \n\
             TASK: Select up to {max} MOST RELEVANT products for this project from the list above. \
             Consider the project description, budget, and required functionality. Match the \
             user's request as closely as possible - if they ask for a specific product type \
             (e.g. \"sink\", \"drill\", \"toilet\"), prioritize products of that type.\n\
             \n\
             Respond with a JSON object of this shape:\n\
             {{\"recommendations\": [{{\"id\": \"product_id_here\", \"reasoning\": \"Brief explanation why this product fits the project\"}}], \
             \"summary\": \"Brief 1-2 sentence overview of your recommendations\"}}",
            description = self.description.as_deref().unwrap_or("General project"),
            budget = self
                .budget
                .map(|b| b.to_string())
                .unwrap_or_else(|| "Not specified".to_string()),
            category = self.category.as_deref().unwrap_or("General"),
            product_list = product_list,
            max = MAX_RECOMMENDATIONS,
        )
    }
}

/// A picked product and why
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendedProduct {
    pub candidate: Candidate,
    /// Empty when the list is a fallback
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub summary: String,
    pub products: Vec<RecommendedProduct>,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        for item in &self.products {
            write!(f, "\n- {}", format_product(&item.candidate.product))?;
            if !item.reasoning.is_empty() {
                write!(f, "\n  {}", item.reasoning)?;
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct Selection {
    recommendations: Vec<Pick>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Deserialize)]
struct Pick {
    /// The model echoes ids as strings or numbers
    id: serde_json::Value,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Map the model's JSON answer back onto the candidates
///
/// Code fences are tolerated. Unknown ids are dropped.
fn parse_selection(answer: &str, candidates: &[Candidate]) -> Result<Recommendation, String> {
    let cleaned = answer.replace("```json", "").replace("```", "");
    let selection: Selection = serde_json::from_str(cleaned.trim()).map_err(|e| e.to_string())?;

    let products = selection
        .recommendations
        .into_iter()
        .filter_map(|pick| {
            let id = match pick.id {
                serde_json::Value::String(id) => id,
                other => other.to_string(),
            };
            let found = candidates.iter().find(|candidate| candidate.id == id);
            if found.is_none() {
                tracing::debug!(%id, "model picked an unknown product");
            }
            found.map(|candidate| RecommendedProduct {
                candidate: candidate.clone(),
                reasoning: pick.reasoning.unwrap_or_default(),
            })
        })
        .take(MAX_RECOMMENDATIONS)
        .collect();

    Ok(Recommendation {
        summary: selection
            .summary
            .filter(|summary| !summary.is_empty())
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        products,
    })
}

fn fallback(candidates: Vec<Candidate>, reason: &str) -> Recommendation {
    Recommendation {
        summary: format!(
            "AI temporarily unavailable ({}). Showing top matching products.",
            reason
        ),
        products: candidates
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|candidate| RecommendedProduct {
                candidate,
                reasoning: String::new(),
            })
            .collect(),
    }
}

/// One-shot recommendation run
pub struct Recommender {
    store: Arc<dyn ProductStore>,
    agent: Agent,
}

impl Recommender {
    pub fn new(provider: Box<dyn LlmProvider>, store: Arc<dyn ProductStore>) -> Self {
        let config = GenerationConfig::default()
            .with_temperature(TEMPERATURE)
            .with_json_output();
        let agent = Agent::new(provider, Box::new(FunctionRegistry::new()), vec![], config, None)
            .with_max_iterations(1);

        Self { store, agent }
    }

    /// # Errors
    ///
    /// Missing criteria and store failures. Model failures fall back to the
    /// cheapest candidates instead.
    pub async fn recommend(
        mut self,
        request: &RecommendationRequest,
    ) -> Result<Recommendation, AppError> {
        request.validate()?;

        let query = request.candidate_query();
        tracing::info!(terms = ?query.terms, budget = ?query.budget, "looking up candidates");
        let candidates = self.store.candidates(&query).await?;
        tracing::debug!(count = candidates.len(), "candidates found");

        if candidates.is_empty() {
            return Ok(Recommendation {
                summary: NO_CANDIDATES.to_string(),
                products: vec![],
            });
        }

        let answer = self
            .agent
            .run_to_completion(request.prompt(&candidates))
            .await
            .map_err(|e| e.to_string())
            .and_then(|answer| parse_selection(&answer, &candidates));

        Ok(match answer {
            Ok(recommendation) => {
                tracing::info!(selected = recommendation.products.len(), "model picked products");
                recommendation
            }
            Err(reason) => {
                tracing::warn!(%reason, "falling back to cheapest candidates");
                fallback(candidates, &reason)
            }
        })
    }
}
