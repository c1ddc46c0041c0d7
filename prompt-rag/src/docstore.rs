//! Document store trait and an in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::StoredDocument;
use crate::error::Result;

/// Read access to the collection of full documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up a document by exact identifier.
    ///
    /// Returns `Ok(None)` when no document has that identifier.
    async fn find_one(&self, document_id: &str) -> Result<Option<StoredDocument>>;
}

/// A document store backed by a `HashMap` behind a `tokio::sync::RwLock`.
///
/// # Example
///
/// ```rust,ignore
/// use prompt_rag::{InMemoryDocumentStore, StoredDocument};
///
/// let store = InMemoryDocumentStore::new();
/// store.insert(StoredDocument::new("d1", "Alpha")).await;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given documents.
    pub fn with_documents(documents: impl IntoIterator<Item = StoredDocument>) -> Self {
        let documents =
            documents.into_iter().map(|doc| (doc.document_id.clone(), doc)).collect();
        Self { documents: RwLock::new(documents) }
    }

    /// Insert or replace a document.
    pub async fn insert(&self, document: StoredDocument) {
        let mut documents = self.documents.write().await;
        documents.insert(document.document_id.clone(), document);
    }

    /// Remove a document, returning it if it was present.
    pub async fn remove(&self, document_id: &str) -> Option<StoredDocument> {
        self.documents.write().await.remove(document_id)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_one(&self, document_id: &str) -> Result<Option<StoredDocument>> {
        let documents = self.documents.read().await;
        Ok(documents.get(document_id).cloned())
    }
}
