//! pgvector (PostgreSQL) backends.
//!
//! Provides [`PgVectorStore`], a [`VectorTableResolver`] whose tables are
//! served by [`PgVectorTable`], and [`PgDocumentStore`], a
//! [`DocumentStore`] over a plain documents table. Everything borrows a
//! caller-owned [`PgPool`]; nothing here opens or closes connections.
//!
//! # Prerequisites
//!
//! - PostgreSQL with the `pgvector` extension installed
//! - Each vector table has the columns `id`, `name`, `document_id`, `text`,
//!   and `embedding vector(N)`
//!
//! # Example
//!
//! ```rust,ignore
//! use prompt_rag::pgvector::PgVectorStore;
//!
//! let store = PgVectorStore::from_pool(pool.clone());
//! let results = prompt_rag::search("define X", &[], &store, &embedder, "docs", &config).await?;
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::docstore::DocumentStore;
use crate::document::StoredDocument;
use crate::error::{RagError, Result};
use crate::vectorstore::{
    REQUIRED_COLUMNS, VectorMatch, VectorQuery, VectorTable, VectorTableResolver,
    validate_table_name,
};

fn map_err(e: sqlx::Error) -> RagError {
    RagError::VectorStoreError { backend: "pgvector".to_string(), message: e.to_string() }
}

/// Validate `name` and fold it to lower case, the form PostgreSQL gives an
/// unquoted identifier. Both the catalog lookup and the generated SQL use it.
fn pg_identifier(name: &str) -> Result<String> {
    Ok(validate_table_name(name)?.to_ascii_lowercase())
}

/// Render an embedding as a pgvector literal such as `[1,2.5,3]`.
fn to_vector_literal(embedding: &[f32]) -> String {
    format!("[{}]", embedding.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","))
}

/// Build the nearest-neighbour statement for `table`. `$1` is the query
/// vector and `$2` the distance bound; the name filter, when present, is `$3`
/// and the limit follows it.
fn nearest_sql(table: &str, filter_names: bool) -> String {
    let (name_clause, limit_param) =
        if filter_names { (" AND name = ANY($3)", "$4") } else { ("", "$3") };
    format!(
        "SELECT id::text AS id, name, document_id::text AS document_id, text, \
                (embedding <=> $1::vector)::float8 AS distance \
         FROM {table} \
         WHERE (embedding <=> $1::vector) <= $2{name_clause} \
         ORDER BY embedding <=> $1::vector \
         LIMIT {limit_param}"
    )
}

/// Resolves table names to pgvector tables in the database behind a pool.
///
/// Resolution checks `information_schema.columns` so that unknown tables and
/// tables without the expected columns are rejected before any search runs.
#[derive(Debug, Clone)]
pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    /// Create a resolver over an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VectorTableResolver for PgVectorStore {
    async fn resolve(&self, table_name: &str) -> Result<Arc<dyn VectorTable>> {
        let table = pg_identifier(table_name)?;

        let rows = sqlx::query(
            "SELECT column_name::text AS column_name \
             FROM information_schema.columns \
             WHERE table_schema = current_schema() AND table_name = $1",
        )
        .bind(&table)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        if rows.is_empty() {
            return Err(RagError::UnknownTable { table: table_name.to_string() });
        }

        let columns = rows
            .iter()
            .map(|row| row.try_get::<String, _>("column_name"))
            .collect::<std::result::Result<HashSet<_>, _>>()
            .map_err(map_err)?;

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| !columns.contains(**c))
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RagError::SchemaMismatch { table: table_name.to_string(), missing });
        }

        debug!(table = %table, "resolved pgvector table");
        Ok(Arc::new(PgVectorTable { pool: self.pool.clone(), table }))
    }
}

/// A single pgvector table, queried with the `<=>` cosine distance operator.
#[derive(Debug, Clone)]
pub struct PgVectorTable {
    pool: PgPool,
    table: String,
}

#[async_trait]
impl VectorTable for PgVectorTable {
    fn name(&self) -> &str {
        &self.table
    }

    async fn nearest(&self, query: &VectorQuery<'_>) -> Result<Vec<VectorMatch>> {
        let filter_names = !query.names.is_empty();
        let sql = nearest_sql(&self.table, filter_names);

        let mut statement = sqlx::query(&sql)
            .bind(to_vector_literal(query.embedding))
            .bind(f64::from(query.max_distance));
        if filter_names {
            statement = statement.bind(query.names.to_vec());
        }
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let rows = statement.bind(limit).fetch_all(&self.pool).await.map_err(map_err)?;

        let matches = rows
            .iter()
            .map(|row| -> std::result::Result<VectorMatch, sqlx::Error> {
                let distance: f64 = row.try_get("distance")?;
                Ok(VectorMatch {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    document_id: row.try_get("document_id")?,
                    text: row.try_get("text")?,
                    distance: distance as f32,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(map_err)?;

        debug!(table = %self.table, count = matches.len(), "pgvector nearest query");
        Ok(matches)
    }
}

/// A [`DocumentStore`] reading `(document_id, text)` rows from a table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    table: String,
}

impl PgDocumentStore {
    /// Create a store reading from `table` through an existing pool.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `table` is not a valid identifier.
    pub fn from_pool(pool: PgPool, table: &str) -> Result<Self> {
        Ok(Self { pool, table: pg_identifier(table)? })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_one(&self, document_id: &str) -> Result<Option<StoredDocument>> {
        let sql = format!(
            "SELECT document_id::text AS document_id, text FROM {} WHERE document_id::text = $1",
            self.table
        );

        let map_err = |e: sqlx::Error| RagError::DocumentStoreError {
            backend: "postgres".to_string(),
            message: e.to_string(),
        };

        let row = sqlx::query(&sql)
            .bind(document_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;

        row.map(|row| -> Result<StoredDocument> {
            Ok(StoredDocument::new(
                row.try_get::<String, _>("document_id").map_err(map_err)?,
                row.try_get::<String, _>("text").map_err(map_err)?,
            ))
        })
        .transpose()
    }
}
