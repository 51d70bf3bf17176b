//! The `search_products` tool exposed to the model
//!
//! The tool never fails from the model's point of view: an empty result comes
//! back as [`NO_RESULTS`] and a store fault as text starting with
//! [`DATABASE_ERROR_PREFIX`], so the model can explain either to the user.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::catalog::{ProductRecord, ProductStore, SearchQuery, RESULT_LIMIT};
use crate::llm::tools::{create_tool_declaration, ToolRegistration};
use crate::llm::ToolDeclaration;

/// Name the model calls the tool by
pub const TOOL_NAME: &str = "search_products";

const TOOL_DESCRIPTION: &str = "Searches the product catalog for products whose category \
     label contains the given text and whose price is at most the given budget. Returns up \
     to three matches with name, price and link.";

/// Returned when nothing matches
pub const NO_RESULTS: &str = "No products found within that budget.";

/// Leads every store failure message
pub const DATABASE_ERROR_PREFIX: &str = "Database Error";

/// Arguments the model supplies
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Product category or keyword to look for, e.g. "faucet"
    pub category: String,
    /// Maximum price in dollars, inclusive
    pub max_price: f64,
}

/// Catalog search bound to a product store
pub struct SearchTool {
    store: Arc<dyn ProductStore>,
}

impl SearchTool {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    /// Search the catalog and render the outcome as text
    pub async fn search(&self, category: &str, max_price: f64) -> String {
        println!(
            "\n   [System] Searching the catalog for '{}' under ${}...",
            category, max_price
        );

        let query = SearchQuery::new(category, max_price);
        match self.store.search(&query).await {
            Ok(products) if products.is_empty() => {
                tracing::debug!(%category, max_price, "no matching products");
                NO_RESULTS.to_string()
            }
            Ok(products) => {
                tracing::debug!(%category, max_price, count = products.len(), "matched products");
                format_products(&products)
            }
            Err(e) => {
                tracing::warn!(%category, max_price, error = %e, "product search failed");
                format!("{}: {}", DATABASE_ERROR_PREFIX, e)
            }
        }
    }

    /// The declaration the model sees
    pub fn declaration() -> ToolDeclaration {
        create_tool_declaration::<SearchArgs>(TOOL_NAME, TOOL_DESCRIPTION)
    }

    /// Registration for a `FunctionRegistry`
    pub fn registration(self: Arc<Self>) -> ToolRegistration {
        ToolRegistration::from_async(Self::declaration(), move |args: SearchArgs| {
            let tool = Arc::clone(&self);
            async move { Ok::<_, String>(tool.search(&args.category, args.max_price).await) }
        })
    }
}

/// One line per product, at most `RESULT_LIMIT` lines
pub fn format_products(products: &[ProductRecord]) -> String {
    products
        .iter()
        .take(RESULT_LIMIT)
        .map(format_product)
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn format_product(product: &ProductRecord) -> String {
    let price = product
        .price
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Product: {} | Price: ${} | Link: {}",
        product.name.as_deref().unwrap_or("Unknown Product"),
        price,
        product.url.as_deref().unwrap_or("#"),
    )
}
