//! Vector table traits and the name → table registry.
//!
//! A [`VectorTableResolver`] is the store handle callers pass into a search:
//! it maps a table name to a [`VectorTable`] at call time and fails fast if
//! the name is unknown or the table cannot serve similarity queries.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// Columns a vector table must expose.
pub const REQUIRED_COLUMNS: [&str; 5] = ["id", "name", "document_id", "text", "embedding"];

/// A nearest-neighbour query against one vector table.
#[derive(Debug, Clone, Copy)]
pub struct VectorQuery<'a> {
    /// The query embedding.
    pub embedding: &'a [f32],
    /// Allowed values of the `name` column. Empty means no restriction.
    pub names: &'a [String],
    /// Largest cosine distance a row may have.
    pub max_distance: f32,
    /// Maximum number of rows to return.
    pub limit: usize,
}

/// A row returned by [`VectorTable::nearest`].
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    /// Identifier of the chunk row.
    pub id: String,
    /// Name of the source the chunk came from.
    pub name: String,
    /// The ID of the parent document.
    pub document_id: String,
    /// The chunk text.
    pub text: String,
    /// Cosine distance between the row embedding and the query embedding.
    pub distance: f32,
}

/// A relation of `(id, name, document_id, text, embedding)` rows queryable
/// by cosine distance.
#[async_trait]
pub trait VectorTable: Send + Sync {
    /// The name this table is bound to.
    fn name(&self) -> &str;

    /// Return rows with `distance <= query.max_distance`, restricted to
    /// `query.names` when non-empty, ordered by ascending distance and
    /// truncated to `query.limit`.
    async fn nearest(&self, query: &VectorQuery<'_>) -> Result<Vec<VectorMatch>>;
}

/// Resolves a table name to a [`VectorTable`].
#[async_trait]
pub trait VectorTableResolver: Send + Sync {
    /// Resolve `table_name`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::UnknownTable`] if nothing is bound to the name and
    /// [`RagError::SchemaMismatch`] if the bound table lacks required columns.
    async fn resolve(&self, table_name: &str) -> Result<Arc<dyn VectorTable>>;
}

/// Check that a table name is usable as an identifier.
///
/// Only ASCII alphanumerics and underscores are allowed.
pub fn validate_table_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(RagError::ConfigError("table name must not be empty".to_string()));
    }
    if let Some(c) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(RagError::ConfigError(format!(
            "table name '{name}' contains invalid character '{c}'"
        )));
    }
    Ok(name)
}

/// A fixed mapping from table names to tables.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use prompt_rag::{InMemoryVectorTable, TableRegistry};
///
/// let registry = TableRegistry::new()
///     .with_table(Arc::new(InMemoryVectorTable::new("docs", 384)))?;
/// let table = registry.resolve("docs").await?;
/// ```
#[derive(Default)]
pub struct TableRegistry {
    tables: HashMap<String, Arc<dyn VectorTable>>,
}

impl TableRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a table under its own name, replacing any previous binding.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the table's name is not a valid identifier.
    pub fn register(&mut self, table: Arc<dyn VectorTable>) -> Result<()> {
        let name = validate_table_name(table.name())?.to_string();
        self.tables.insert(name, table);
        Ok(())
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with_table(mut self, table: Arc<dyn VectorTable>) -> Result<Self> {
        self.register(table)?;
        Ok(self)
    }

    /// Names of all bound tables, sorted.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl VectorTableResolver for TableRegistry {
    async fn resolve(&self, table_name: &str) -> Result<Arc<dyn VectorTable>> {
        validate_table_name(table_name)?;
        self.tables
            .get(table_name)
            .cloned()
            .ok_or_else(|| RagError::UnknownTable { table: table_name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory::InMemoryVectorTable;

    #[test]
    fn table_names_are_validated() {
        assert!(validate_table_name("docs_v2").is_ok());
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("docs; DROP TABLE x").is_err());
        assert!(validate_table_name("my-docs").is_err());
    }

    #[tokio::test]
    async fn resolves_registered_tables_only() {
        let registry = TableRegistry::new()
            .with_table(Arc::new(InMemoryVectorTable::new("docs", 2)))
            .unwrap()
            .with_table(Arc::new(InMemoryVectorTable::new("faq", 2)))
            .unwrap();

        assert_eq!(registry.table_names(), vec!["docs", "faq"]);
        assert_eq!(registry.resolve("faq").await.unwrap().name(), "faq");

        let err = registry.resolve("missing").await.err().unwrap();
        assert!(matches!(err, RagError::UnknownTable { ref table } if table == "missing"));
    }

    #[test]
    fn rejects_tables_with_invalid_names() {
        let mut registry = TableRegistry::new();
        let err = registry.register(Arc::new(InMemoryVectorTable::new("bad name", 2)));
        assert!(matches!(err, Err(RagError::ConfigError(_))));
    }
}
