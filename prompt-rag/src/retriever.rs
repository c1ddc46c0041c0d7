//! Pluggable retrieval strategies.

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorTableResolver;

/// Everything a [`Retriever`] receives for one user message.
///
/// All collaborators are borrowed for the duration of the call.
#[derive(Clone, Copy)]
pub struct RetrievalRequest<'a> {
    /// The user message to find context for.
    pub message: &'a str,
    /// Allowed document identifiers. Empty means every document is eligible.
    pub document_ids: &'a [String],
    /// Store handle used to resolve `table_name`.
    pub store: &'a dyn VectorTableResolver,
    /// Embedder for the query text.
    pub embedder: &'a dyn EmbeddingProvider,
    /// The vector table to search.
    pub table_name: &'a str,
}

/// A strategy that finds chunks relevant to a message.
///
/// [`CosineSimilaritySearch`](crate::search::CosineSimilaritySearch) is the
/// default implementation. Keyword or hybrid strategies plug in by
/// implementing this trait.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return relevant chunks, most relevant first.
    async fn retrieve(&self, request: RetrievalRequest<'_>) -> Result<Vec<SearchResult>>;
}
