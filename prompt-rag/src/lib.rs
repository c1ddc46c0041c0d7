//! Prompt assembly with static document injection and retrieval-augmented
//! generation.
//!
//! This crate provides:
//! - [`inject_context_documents`] — inline full reference documents into a
//!   system prompt
//! - [`RagAugmenter`] — retrieve relevant chunks for a user message and
//!   format them as excerpts
//! - [`search`] — cosine similarity search over a named vector table
//!
//! Embedding models, document stores, and vector tables are collaborators
//! behind the [`EmbeddingProvider`], [`DocumentStore`], and
//! [`VectorTableResolver`] traits. In-memory implementations are always
//! available; PostgreSQL/pgvector and OpenAI backends sit behind the
//! `pgvector` and `openai` features.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prompt_rag::{
//!     CosineSimilaritySearch, InMemoryDocumentStore, RagAugmenter, inject_context_documents,
//! };
//!
//! inject_context_documents(&mut spec, &documents).await?;
//!
//! let augmenter = RagAugmenter::builder()
//!     .retriever(Arc::new(CosineSimilaritySearch::default()))
//!     .table_name("course_docs")
//!     .persist_results(true)
//!     .build();
//! let turn = augmenter.augment(&spec, user_message, &tables, &embedder).await?;
//! ```

pub mod augment;
pub mod config;
pub mod docstore;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inject;
pub mod inmemory;
pub mod retriever;
pub mod search;
pub mod vectorstore;

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "pgvector")]
pub mod pgvector;

pub use augment::{RagAugmentation, RagAugmenter, RagAugmenterBuilder, format_search_results};
pub use config::{SearchConfig, SearchConfigBuilder};
pub use docstore::{DocumentStore, InMemoryDocumentStore};
pub use document::{
    DocumentReference, DocumentsSpec, PromptSpec, SearchResult, StoredDocument, VectorRow,
};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inject::inject_context_documents;
pub use inmemory::InMemoryVectorTable;
pub use retriever::{RetrievalRequest, Retriever};
pub use search::{CosineSimilaritySearch, DEFAULT_TABLE_NAME, search};
pub use vectorstore::{
    REQUIRED_COLUMNS, TableRegistry, VectorMatch, VectorQuery, VectorTable, VectorTableResolver,
    validate_table_name,
};

#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
#[cfg(feature = "pgvector")]
pub use pgvector::{PgDocumentStore, PgVectorStore, PgVectorTable};
