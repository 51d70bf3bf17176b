use async_trait::async_trait;

use crate::catalog::{
    error::Result,
    query::{CandidateQuery, SearchQuery},
    types::{Candidate, ProductRecord},
};

/// Read access to the product collection
///
/// `search` returns at most `RESULT_LIMIT` records, in whatever order the
/// backing store produces them.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Find products whose label contains the category and whose price is at
    /// most the ceiling
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductRecord>>;

    /// Up to `CANDIDATE_LIMIT` products matching any term, cheapest first
    async fn candidates(&self, query: &CandidateQuery) -> Result<Vec<Candidate>>;
}
