//! Direct PostgreSQL product store

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

use crate::catalog::{
    config::{ColumnMap, StoreConfig},
    error::{Result, StoreError},
    query::{CandidateQuery, SearchQuery, CANDIDATE_LIMIT, RESULT_LIMIT},
    store::ProductStore,
    types::{Candidate, ProductRecord},
};

/// Product store backed by a pooled Postgres connection
///
/// The pool connects lazily, so an unreachable server surfaces on the first
/// search rather than at construction.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: Pool,
    sql: String,
    candidates_sql: String,
}

impl PostgresProductStore {
    /// Build the pool from a `postgres://` endpoint
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let pg_config = config
            .require_endpoint()?
            .parse::<tokio_postgres::Config>()
            .map_err(|e| StoreError::Configuration(format!("Invalid connection string: {}", e)))?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let manager = Manager::from_config(pg_config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.max_pool_size)
            .runtime(Runtime::Tokio1)
            .build()?;

        Ok(Self {
            pool,
            sql: search_sql(&config.table, &config.columns),
            candidates_sql: candidates_sql(&config.table, &config.columns),
        })
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[tracing::instrument(skip_all, fields(category = %query.category, max_price = query.max_price))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProductRecord>> {
        let conn = self.pool.get().await?;

        let rows = conn
            .query(&self.sql, &[&query.like_pattern(), &query.max_price])
            .await?;
        tracing::debug!(rows = rows.len(), "store query returned");

        rows.iter()
            .map(|row| {
                Ok(ProductRecord {
                    name: row.try_get(0)?,
                    price: row.try_get(1)?,
                    url: row.try_get(2)?,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip_all, fields(terms = query.terms.len(), budget = ?query.budget))]
    async fn candidates(&self, query: &CandidateQuery) -> Result<Vec<Candidate>> {
        let conn = self.pool.get().await?;

        let rows = conn
            .query(&self.candidates_sql, &[&query.like_patterns(), &query.budget])
            .await?;
        tracing::debug!(rows = rows.len(), "store query returned");

        rows.iter()
            .map(|row| {
                Ok(Candidate {
                    id: row.try_get::<_, Option<String>>(0)?.unwrap_or_default(),
                    label: row.try_get(1)?,
                    product: ProductRecord {
                        name: row.try_get(2)?,
                        price: row.try_get(3)?,
                        url: row.try_get(4)?,
                    },
                })
            })
            .collect()
    }
}

/// Parameterised search statement; `$1` is the ILIKE pattern, `$2` the ceiling
///
/// Columns are cast so `numeric`, `real` and `varchar` tables all decode into
/// the same Rust types.
fn search_sql(table: &str, columns: &ColumnMap) -> String {
    format!(
        "SELECT {name}::text, {price}::float8, {url}::text FROM {table} \
         WHERE {label} ILIKE $1 AND {price} <= $2::float8 LIMIT {limit}",
        name = quote_ident(&columns.name),
        price = quote_ident(&columns.price),
        url = quote_ident(&columns.url),
        label = quote_ident(&columns.label),
        table = quote_ident(table),
        limit = RESULT_LIMIT,
    )
}

/// Candidate statement; `$1` is a `text[]` of ILIKE patterns, where an empty
/// array matches every row, and `$2` an optional price ceiling
fn candidates_sql(table: &str, columns: &ColumnMap) -> String {
    format!(
        "SELECT {id}::text, {label}::text, {name}::text, {price}::float8, {url}::text FROM {table} \
         WHERE (cardinality($1::text[]) = 0 OR {label} ILIKE ANY($1::text[]) OR {name} ILIKE ANY($1::text[])) \
         AND ($2::float8 IS NULL OR {price} <= $2::float8) \
         ORDER BY {price} ASC LIMIT {limit}",
        id = quote_ident(&columns.id),
        label = quote_ident(&columns.label),
        name = quote_ident(&columns.name),
        price = quote_ident(&columns.price),
        url = quote_ident(&columns.url),
        table = quote_ident(table),
        limit = CANDIDATE_LIMIT,
    )
}

/// Quote an identifier, doubling embedded quotes
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
