use serde_json::{Map, Value};

use crate::catalog::config::ColumnMap;

/// One product row as read from the store
///
/// Every field is optional: the table is loosely populated and a row may lack
/// any of them. Records are never written back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductRecord {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub url: Option<String>,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price: f64, url: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            url: Some(url.into()),
        }
    }

    /// Build a record from a JSON row using the configured column names
    pub fn from_row(row: &Map<String, Value>, columns: &ColumnMap) -> Self {
        Self {
            name: row.get(&columns.name).and_then(text_value),
            price: row.get(&columns.price).and_then(price_value),
            url: row.get(&columns.url).and_then(text_value),
        }
    }
}

/// A recommendation candidate: a product plus what the model needs to pick it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    /// Row id as text, whatever the column's type
    pub id: String,
    pub label: Option<String>,
    pub product: ProductRecord,
}

impl Candidate {
    pub fn from_row(row: &Map<String, Value>, columns: &ColumnMap) -> Self {
        Self {
            id: row.get(&columns.id).and_then(text_value).unwrap_or_default(),
            label: row.get(&columns.label).and_then(text_value),
            product: ProductRecord::from_row(row, columns),
        }
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Prices arrive as JSON numbers, or as strings for `numeric` columns
fn price_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_from_row_default_columns() {
        let record = ProductRecord::from_row(
            &row(json!({
                "id": 7,
                "Label": "Bathroom Faucets",
                "Product": "Single-Handle Faucet",
                "Prices": 149.99,
                "Grainger URL": "https://www.grainger.com/product/1"
            })),
            &ColumnMap::default(),
        );

        assert_eq!(
            record,
            ProductRecord::new("Single-Handle Faucet", 149.99, "https://www.grainger.com/product/1")
        );
    }

    #[test]
    fn test_from_row_missing_and_null_fields() {
        let record = ProductRecord::from_row(
            &row(json!({"Product": null, "Label": "Faucets"})),
            &ColumnMap::default(),
        );
        assert_eq!(record, ProductRecord::default());
    }

    #[test]
    fn test_price_from_string() {
        assert_eq!(price_value(&json!("150.00")), Some(150.0));
        assert_eq!(price_value(&json!(" $89.5 ")), Some(89.5));
        assert_eq!(price_value(&json!("call for price")), None);
        assert_eq!(price_value(&json!(true)), None);
    }

    #[test]
    fn test_custom_columns() {
        let columns = ColumnMap {
            id: "sku".to_string(),
            label: "category".to_string(),
            name: "title".to_string(),
            price: "price".to_string(),
            url: "link".to_string(),
        };
        let record = ProductRecord::from_row(
            &row(json!({"title": "Widget", "price": 3, "link": "https://x/w"})),
            &columns,
        );
        assert_eq!(record, ProductRecord::new("Widget", 3.0, "https://x/w"));
    }

    #[test]
    fn test_candidate_from_row() {
        let candidate = Candidate::from_row(
            &row(json!({
                "id": 42,
                "Label": "Kitchen Sinks",
                "Product": "Stainless Sink",
                "Prices": "310.00",
                "Grainger URL": null
            })),
            &ColumnMap::default(),
        );

        assert_eq!(candidate.id, "42");
        assert_eq!(candidate.label.as_deref(), Some("Kitchen Sinks"));
        assert_eq!(candidate.product.name.as_deref(), Some("Stainless Sink"));
        assert_eq!(candidate.product.price, Some(310.0));
        assert!(candidate.product.url.is_none());
    }
}
