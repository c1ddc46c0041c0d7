//! Retrieval-augmented message assembly.
//!
//! The [`RagAugmenter`] reads the candidate documents from a
//! [`PromptSpec`], asks its [`Retriever`] for relevant chunks, and formats
//! them as excerpts that can be appended to the user message.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prompt_rag::{CosineSimilaritySearch, RagAugmenter};
//!
//! let augmenter = RagAugmenter::builder()
//!     .retriever(Arc::new(CosineSimilaritySearch::default()))
//!     .table_name("course_docs")
//!     .persist_results(true)
//!     .build();
//!
//! let augmented = augmenter.augment(&spec, "What is X?", &store, &embedder).await?;
//! ```

use std::sync::Arc;

use tracing::info;

use crate::document::{PromptSpec, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::retriever::{RetrievalRequest, Retriever};
use crate::vectorstore::VectorTableResolver;

/// The outcome of [`RagAugmenter::augment`].
#[derive(Debug, Clone, PartialEq)]
pub struct RagAugmentation {
    /// The user message, extended with excerpts when results are persisted.
    pub message: String,
    /// The formatted excerpt block, or `None` if retrieval did not run.
    pub formatted_results: Option<String>,
    /// The raw retrieved chunks, or `None` if retrieval did not run.
    pub results: Option<Vec<SearchResult>>,
}

impl RagAugmentation {
    fn passthrough(message: &str) -> Self {
        Self { message: message.to_string(), formatted_results: None, results: None }
    }
}

/// Format retrieved chunks as excerpt blocks separated by blank lines.
///
/// Each block reads `Document: <name>` followed by
/// `Potentially Relevant Text Excerpt: <text>`.
pub fn format_search_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("Document: {}\nPotentially Relevant Text Excerpt: {}", r.name, r.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Augments user messages with chunks retrieved for a prompt spec.
///
/// Construct one via [`RagAugmenter::builder()`].
#[derive(Clone, Default)]
pub struct RagAugmenter {
    retriever: Option<Arc<dyn Retriever>>,
    table_name: Option<String>,
    persist_results: bool,
}

impl RagAugmenter {
    /// Create a new [`RagAugmenterBuilder`].
    pub fn builder() -> RagAugmenterBuilder {
        RagAugmenterBuilder::default()
    }

    /// The vector table searched, if configured.
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Whether excerpts are appended to the returned message.
    pub fn persist_results(&self) -> bool {
        self.persist_results
    }

    /// Retrieve context for `message` from the spec's `rag_documents`.
    ///
    /// Without `rag_documents` or without a retriever the message is
    /// returned as-is and no results are produced. When `persist_results` is
    /// set the message becomes `message + "\n\n" + connecting + "\n" +
    /// formatted`; otherwise only the formatted block is returned.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if retrieval is requested but no
    /// table name is configured. Retriever errors are returned unchanged.
    pub async fn augment(
        &self,
        spec: &PromptSpec,
        message: &str,
        store: &dyn VectorTableResolver,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<RagAugmentation> {
        let (Some(references), Some(retriever)) = (spec.rag_documents(), self.retriever.as_ref())
        else {
            info!("no rag documents found in prompt spec");
            return Ok(RagAugmentation::passthrough(message));
        };
        info!(count = references.len(), "rag documents found in prompt spec");

        let table_name = self
            .table_name
            .as_deref()
            .ok_or_else(|| RagError::ConfigError("table name is required for RAG".to_string()))?;

        let connecting = spec
            .documents
            .as_ref()
            .and_then(|d| d.rag_connecting_prompt.as_deref())
            .unwrap_or_default();

        let document_ids: Vec<String> = references.iter().map(|r| r.document_id.clone()).collect();
        let results = retriever
            .retrieve(RetrievalRequest {
                message,
                document_ids: &document_ids,
                store,
                embedder,
                table_name,
            })
            .await?;

        let formatted = format_search_results(&results);
        let message = if self.persist_results {
            format!("{message}\n\n{connecting}\n{formatted}")
        } else {
            message.to_string()
        };

        Ok(RagAugmentation { message, formatted_results: Some(formatted), results: Some(results) })
    }
}

/// Builder for constructing a [`RagAugmenter`].
///
/// Every field is optional. A missing retriever turns
/// [`augment`](RagAugmenter::augment) into a pass-through; a missing table
/// name is reported when retrieval is attempted.
#[derive(Default)]
pub struct RagAugmenterBuilder {
    retriever: Option<Arc<dyn Retriever>>,
    table_name: Option<String>,
    persist_results: bool,
}

impl RagAugmenterBuilder {
    /// Set the retrieval strategy.
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the vector table to search.
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Append formatted excerpts to the returned message.
    pub fn persist_results(mut self, persist: bool) -> Self {
        self.persist_results = persist;
        self
    }

    /// Build the [`RagAugmenter`].
    pub fn build(self) -> RagAugmenter {
        RagAugmenter {
            retriever: self.retriever,
            table_name: self.table_name,
            persist_results: self.persist_results,
        }
    }
}
