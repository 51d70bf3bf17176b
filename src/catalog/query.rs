use crate::catalog::config::ColumnMap;

/// Maximum number of products a search returns
pub const RESULT_LIMIT: usize = 3;

/// Maximum number of candidates a recommendation considers
pub const CANDIDATE_LIMIT: usize = 30;

/// A single catalog search: label contains `category` (case-insensitive) and
/// price is at most `max_price`.
///
/// Inputs are not validated. An empty category matches every label and a
/// non-positive ceiling simply matches nothing priced above zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub category: String,
    pub max_price: f64,
}

impl SearchQuery {
    pub fn new(category: impl Into<String>, max_price: f64) -> Self {
        Self {
            category: category.into(),
            max_price,
        }
    }

    /// `ILIKE` pattern for a literal substring match
    pub fn like_pattern(&self) -> String {
        format!("%{}%", escape_like(&self.category))
    }

    /// Whether REST rows must be re-checked with [`Self::matches_label`]
    ///
    /// PostgREST turns every `*` in a like value into `%`, so a literal `*`
    /// is sent as `_` and the server returns a superset.
    pub fn needs_client_filter(&self) -> bool {
        self.category.contains('*')
    }

    /// Case-insensitive literal substring test, the same match `ILIKE` makes
    pub fn matches_label(&self, label: &str) -> bool {
        label.to_lowercase().contains(&self.category.to_lowercase())
    }

    /// PostgREST query parameters for this search
    ///
    /// Equivalent to `SELECT * FROM t WHERE label ILIKE '%c%' AND price <= p LIMIT 3`.
    /// The limit is left out when the rows are filtered again client side.
    pub fn postgrest_params(&self, columns: &ColumnMap) -> Vec<(String, String)> {
        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            (
                columns.label.clone(),
                format!("ilike.*{}*", escape_postgrest_like(&self.category)),
            ),
            (columns.price.clone(), format!("lte.{}", self.max_price)),
        ];
        if !self.needs_client_filter() {
            params.push(("limit".to_string(), RESULT_LIMIT.to_string()));
        }
        params
    }
}

/// Candidate products for a recommendation
///
/// A product qualifies when its label or name contains any of `terms`, or
/// unconditionally when there are no terms. Cheapest first, at most
/// `CANDIDATE_LIMIT` rows. A `*` in a term matches any single character.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    pub terms: Vec<String>,
    pub budget: Option<f64>,
}

impl CandidateQuery {
    /// One `ILIKE` pattern per term
    pub fn like_patterns(&self) -> Vec<String> {
        self.terms
            .iter()
            .map(|term| format!("%{}%", escape_like(term)))
            .collect()
    }

    pub fn postgrest_params(&self, columns: &ColumnMap) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        if !self.terms.is_empty() {
            let conditions: Vec<String> = self
                .terms
                .iter()
                .flat_map(|term| {
                    let value = quote_postgrest_value(&format!("*{}*", escape_postgrest_like(term)));
                    [&columns.label, &columns.name]
                        .map(|column| format!("{}.ilike.{}", quote_postgrest_field(column), value))
                })
                .collect();
            params.push(("or".to_string(), format!("({})", conditions.join(","))));
        }

        if let Some(budget) = self.budget {
            params.push((columns.price.clone(), format!("lte.{}", budget)));
        }

        params.push(("order".to_string(), format!("{}.asc", quote_postgrest_field(&columns.price))));
        params.push(("limit".to_string(), CANDIDATE_LIMIT.to_string()));
        params
    }
}

/// Escape LIKE wildcards so user text only ever matches literally
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// [`escape_like`] for PostgREST, where `*` can only be sent as `_`
fn escape_postgrest_like(text: &str) -> String {
    escape_like(text).replace('*', "_")
}

/// Double-quoted value inside an `or=(...)` list
fn quote_postgrest_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Column names with spaces or reserved characters must be quoted in
/// logical filters and `order`
fn quote_postgrest_field(column: &str) -> String {
    if column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        column.to_string()
    } else {
        quote_postgrest_value(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(SearchQuery::new("faucet", 200.0).like_pattern(), "%faucet%");
        assert_eq!(SearchQuery::new("", 200.0).like_pattern(), "%%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(
            SearchQuery::new("50%_off\\", 10.0).like_pattern(),
            "%50\\%\\_off\\\\%"
        );
    }

    #[test]
    fn test_postgrest_params() {
        let params = SearchQuery::new("faucet", 200.0).postgrest_params(&ColumnMap::default());

        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("Label".to_string(), "ilike.*faucet*".to_string()),
                ("Prices".to_string(), "lte.200".to_string()),
                ("limit".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_postgrest_params_literal_asterisk() {
        let query = SearchQuery::new("2*4", 10.0);
        let params = query.postgrest_params(&ColumnMap::default());

        assert_eq!(params[1].1, "ilike.*2_4*");
        assert!(params.iter().all(|(key, _)| key != "limit"));
        assert!(query.needs_client_filter());
        assert!(query.matches_label("Lumber 2*4 Stud"));
        assert!(!query.matches_label("2x4 Lumber"));
    }

    #[test]
    fn test_postgrest_params_escapes_like_wildcards() {
        let params = SearchQuery::new("50%_off", 10.0).postgrest_params(&ColumnMap::default());
        assert_eq!(params[1].1, "ilike.*50\\%\\_off*");
    }

    #[test]
    fn test_matches_label_ignores_case() {
        let query = SearchQuery::new("Faucet", 200.0);
        assert!(!query.needs_client_filter());
        assert!(query.matches_label("Bathroom FAUCETS"));
        assert!(!query.matches_label("Sinks"));
    }

    #[test]
    fn test_postgrest_params_fractional_price() {
        let params = SearchQuery::new("hose", 19.99).postgrest_params(&ColumnMap::default());
        assert_eq!(params[2].1, "lte.19.99");
    }

    #[test]
    fn test_candidate_params() {
        let query = CandidateQuery {
            terms: vec!["sink".to_string(), "drain".to_string()],
            budget: Some(500.0),
        };

        assert_eq!(
            query.postgrest_params(&ColumnMap::default()),
            vec![
                ("select".to_string(), "*".to_string()),
                (
                    "or".to_string(),
                    r#"(Label.ilike."*sink*",Product.ilike."*sink*",Label.ilike."*drain*",Product.ilike."*drain*")"#
                        .to_string()
                ),
                ("Prices".to_string(), "lte.500".to_string()),
                ("order".to_string(), "Prices.asc".to_string()),
                ("limit".to_string(), "30".to_string()),
            ]
        );
    }

    #[test]
    fn test_candidate_params_without_terms_or_budget() {
        let query = CandidateQuery {
            terms: vec![],
            budget: None,
        };
        let params = query.postgrest_params(&ColumnMap::default());
        let keys: Vec<&str> = params.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["select", "order", "limit"]);
    }

    #[test]
    fn test_candidate_terms_are_quoted() {
        let query = CandidateQuery {
            terms: vec!["a,b\"c)".to_string()],
            budget: None,
        };
        let params = query.postgrest_params(&ColumnMap::default());
        assert_eq!(
            params[1].1,
            r#"(Label.ilike."*a,b\"c)*",Product.ilike."*a,b\"c)*")"#
        );
        assert_eq!(query.like_patterns(), vec!["%a,b\"c)%"]);
    }

    #[test]
    fn test_quote_postgrest_field() {
        assert_eq!(quote_postgrest_field("Prices"), "Prices");
        assert_eq!(quote_postgrest_field("Grainger URL"), "\"Grainger URL\"");
    }
}
