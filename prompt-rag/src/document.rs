//! Data types for prompt specs, stored documents, vector rows, and search results.

use serde::{Deserialize, Serialize};

/// A system prompt record as supplied by the caller for one conversation turn.
///
/// Only `prompt` and `documents` are interpreted here. Any other keys of the
/// record are kept in `extra` so the spec can be handed back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PromptSpec {
    /// The system prompt text. Extended in place by document injection.
    pub prompt: String,
    /// Reference documents attached to this prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentsSpec>,
    /// Keys of the record this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PromptSpec {
    /// Create a spec with the given prompt text and no documents.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Self::default() }
    }

    /// Attach a documents block.
    pub fn with_documents(mut self, documents: DocumentsSpec) -> Self {
        self.documents = Some(documents);
        self
    }

    /// The context documents to inline, if the spec lists any.
    pub fn context_documents(&self) -> Option<&[DocumentReference]> {
        self.documents.as_ref()?.context_documents.as_deref()
    }

    /// The candidate documents for retrieval, if the spec lists any.
    pub fn rag_documents(&self) -> Option<&[DocumentReference]> {
        self.documents.as_ref()?.rag_documents.as_deref()
    }
}

/// The `documents` block of a [`PromptSpec`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentsSpec {
    /// Documents whose full text is appended to the system prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_documents: Option<Vec<DocumentReference>>,
    /// Phrase placed between the prompt and the inlined documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_connecting_prompt: Option<String>,
    /// Documents whose chunks are eligible for retrieval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_documents: Option<Vec<DocumentReference>>,
    /// Phrase placed between the user message and retrieved excerpts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_connecting_prompt: Option<String>,
}

/// A pointer into the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentReference {
    /// Identifier of the referenced document.
    pub document_id: String,
}

impl DocumentReference {
    /// Create a reference to the given document.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self { document_id: document_id.into() }
    }
}

/// A full document as held by the document store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredDocument {
    /// Unique identifier for the document.
    pub document_id: String,
    /// The full text content of the document.
    pub text: String,
}

impl StoredDocument {
    /// Create a document with the given id and text.
    pub fn new(document_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { document_id: document_id.into(), text: text.into() }
    }
}

/// One indexed chunk in a vector table.
///
/// A document may contribute several rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRow {
    /// Unique identifier for the chunk row.
    pub id: String,
    /// Name of the source the chunk came from. Retrieval filters on this column.
    pub name: String,
    /// The ID of the parent document.
    pub document_id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
}

/// A retrieved chunk with its similarity to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Identifier of the chunk row.
    pub id: String,
    /// Name of the source the chunk came from.
    pub name: String,
    /// The ID of the parent document.
    pub document_id: String,
    /// The chunk text.
    pub text: String,
    /// `1 - cosine_distance`; higher is more relevant.
    pub similarity: f32,
}
