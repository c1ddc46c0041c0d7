//! Error types for the `prompt-rag` crate.

use thiserror::Error;

/// Errors that can occur while assembling prompts or retrieving context.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document referenced by a prompt spec is absent from the document store.
    #[error("Document {document_id} not found")]
    MissingDocument {
        /// The identifier that failed to resolve.
        document_id: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// No vector table is bound to the requested name.
    #[error("Unknown vector table '{table}'")]
    UnknownTable {
        /// The requested table name.
        table: String,
    },

    /// The resolved table lacks columns required for similarity search.
    #[error("Vector table '{table}' is missing columns: {}", .missing.join(", "))]
    SchemaMismatch {
        /// The resolved table name.
        table: String,
        /// The required columns that were not found.
        missing: Vec<String>,
    },

    /// An embedding does not have the dimensionality the table stores.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the stored embeddings.
        expected: usize,
        /// Dimensionality of the offending embedding.
        actual: usize,
    },

    /// An error occurred in the document store backend.
    #[error("Document store error ({backend}): {message}")]
    DocumentStoreError {
        /// The document store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },
}

impl RagError {
    /// Whether this error was raised while embedding, resolving a table, or
    /// executing a similarity query.
    pub fn is_retrieval_error(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingError { .. }
                | Self::VectorStoreError { .. }
                | Self::UnknownTable { .. }
                | Self::SchemaMismatch { .. }
                | Self::DimensionMismatch { .. }
        )
    }
}

/// A convenience result type for prompt assembly operations.
pub type Result<T> = std::result::Result<T, RagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_document_names_the_id() {
        let err = RagError::MissingDocument { document_id: "d7".to_string() };
        assert_eq!(err.to_string(), "Document d7 not found");
        assert!(!err.is_retrieval_error());
    }

    #[test]
    fn schema_mismatch_lists_columns() {
        let err = RagError::SchemaMismatch {
            table: "docs".to_string(),
            missing: vec!["name".to_string(), "embedding".to_string()],
        };
        assert_eq!(err.to_string(), "Vector table 'docs' is missing columns: name, embedding");
        assert!(err.is_retrieval_error());
    }
}
