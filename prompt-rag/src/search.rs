//! Vector similarity search over a named table.
//!
//! [`search`] embeds the message, resolves the table, and issues a single
//! filtered, ordered, limited nearest-neighbour query. All ranking happens
//! in the table backend.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::config::SearchConfig;
use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::retriever::{RetrievalRequest, Retriever};
use crate::vectorstore::{VectorQuery, VectorTableResolver};

/// Table searched when the caller has no preference.
pub const DEFAULT_TABLE_NAME: &str = "default";

/// Find the chunks in `table_name` most similar to `message`.
///
/// Rows are restricted to those whose `name` is in `document_ids` (all rows
/// when it is empty) and whose similarity reaches
/// `config.similarity_threshold`. At most `config.top_n` results are
/// returned, most similar first.
///
/// # Errors
///
/// Any embedding, table resolution, or query failure is logged and returned
/// unchanged.
pub async fn search(
    message: &str,
    document_ids: &[String],
    store: &dyn VectorTableResolver,
    embedder: &dyn EmbeddingProvider,
    table_name: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>> {
    match run_search(message, document_ids, store, embedder, table_name, config).await {
        Ok(results) => Ok(results),
        Err(e) => {
            error!(table = table_name, error = %e, "error performing similarity search");
            Err(e)
        }
    }
}

async fn run_search(
    message: &str,
    document_ids: &[String],
    store: &dyn VectorTableResolver,
    embedder: &dyn EmbeddingProvider,
    table_name: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>> {
    let query_embedding = embedder.embed(message).await?;
    debug!(dimensions = query_embedding.len(), "embedded query text");

    info!(table = table_name, "searching vector table");
    let table = store.resolve(table_name).await?;

    let query = VectorQuery {
        embedding: &query_embedding,
        names: document_ids,
        max_distance: config.max_distance(),
        limit: config.top_n,
    };
    let matches = table.nearest(&query).await?;

    let results: Vec<SearchResult> = matches
        .into_iter()
        .map(|m| SearchResult {
            id: m.id,
            name: m.name,
            document_id: m.document_id,
            text: m.text,
            similarity: 1.0 - m.distance,
        })
        .collect();

    let document_count = results.iter().map(|r| r.name.as_str()).collect::<HashSet<_>>().len();
    info!(result_count = results.len(), document_count, "found relevant chunks");

    Ok(results)
}

/// The default [`Retriever`]: cosine similarity search via [`search`].
#[derive(Debug, Clone, Default)]
pub struct CosineSimilaritySearch {
    config: SearchConfig,
}

impl CosineSimilaritySearch {
    /// Create a retriever with the given search parameters.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Return a reference to the search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[async_trait]
impl Retriever for CosineSimilaritySearch {
    async fn retrieve(&self, request: RetrievalRequest<'_>) -> Result<Vec<SearchResult>> {
        search(
            request.message,
            request.document_ids,
            request.store,
            request.embedder,
            request.table_name,
            &self.config,
        )
        .await
    }
}
