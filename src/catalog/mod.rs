//! Product catalog client
//!
//! Read-only access to the product table behind the search tool. Two backends
//! implement [`ProductStore`]:
//!
//! - [`RestProductStore`] talks to the PostgREST API of a Supabase project
//! - [`PostgresProductStore`] connects to PostgreSQL directly through a pool
//!
//! [`open_store`] picks one from the endpoint's scheme.
//!
//! # Example
//!
//! ```no_run
//! use product_agent::catalog::{open_store, SearchQuery, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreConfig::new(
//!         Some("https://project.supabase.co".to_string()),
//!         Some("anon-key".to_string()),
//!     );
//!     let store = open_store(&config)?;
//!     let products = store.search(&SearchQuery::new("faucet", 200.0)).await?;
//!     println!("{} products", products.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod postgres;
pub mod query;
pub mod rest;
pub mod store;
pub mod types;

use std::sync::Arc;

pub use config::{ColumnMap, StoreBackend, StoreConfig};
pub use error::{Result, StoreError};
pub use postgres::PostgresProductStore;
pub use query::{CandidateQuery, SearchQuery, CANDIDATE_LIMIT, RESULT_LIMIT};
pub use rest::RestProductStore;
pub use store::ProductStore;
pub use types::{Candidate, ProductRecord};

/// Construct the store the configuration points at
///
/// Neither backend contacts the server here.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn ProductStore>> {
    let store: Arc<dyn ProductStore> = match config.backend() {
        StoreBackend::Rest => Arc::new(RestProductStore::new(config.clone())?),
        StoreBackend::Postgres => Arc::new(PostgresProductStore::new(config)?),
    };
    tracing::debug!(backend = ?config.backend(), table = %config.table, "opened product store");
    Ok(store)
}
