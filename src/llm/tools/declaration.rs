//! Declarations derived from argument types

use schemars::{schema_for, JsonSchema};

use crate::llm::core::types::ToolDeclaration;

/// Declare a tool whose parameters are the JSON Schema of `T`
///
/// Doc comments on the fields of `T` become the parameter descriptions the
/// model reads, so they should say what a good value looks like.
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// struct SearchArgs {
///     /// Product category to look for
///     category: String,
///     /// Inclusive price ceiling
///     max_price: f64,
/// }
///
/// let declaration = create_tool_declaration::<SearchArgs>(
///     "search_products",
///     "Search the product catalog",
/// );
/// ```
pub fn create_tool_declaration<T: JsonSchema>(
    name: impl Into<String>,
    description: impl Into<String>,
) -> ToolDeclaration {
    let parameters = serde_json::to_value(schema_for!(T))
        .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));

    ToolDeclaration {
        name: name.into(),
        description: description.into(),
        parameters,
    }
}
