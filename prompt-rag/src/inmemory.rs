//! In-memory vector table using exact cosine distance.
//!
//! [`InMemoryVectorTable`] keeps its rows in a `Vec` behind a
//! `tokio::sync::RwLock` and scans all of them per query. It is suitable
//! for development, testing, and small corpora.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::VectorRow;
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorMatch, VectorQuery, VectorTable};

/// An in-memory [`VectorTable`].
///
/// Rows with equal distance are returned in insertion order.
///
/// # Example
///
/// ```rust,ignore
/// use prompt_rag::InMemoryVectorTable;
///
/// let table = InMemoryVectorTable::new("docs", 384);
/// table.insert(rows).await?;
/// ```
#[derive(Debug)]
pub struct InMemoryVectorTable {
    name: String,
    dimensions: usize,
    rows: RwLock<Vec<VectorRow>>,
}

impl InMemoryVectorTable {
    /// Create an empty table storing embeddings of the given dimensionality.
    pub fn new(name: impl Into<String>, dimensions: usize) -> Self {
        Self { name: name.into(), dimensions, rows: RwLock::new(Vec::new()) }
    }

    /// Dimensionality of the stored embeddings.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the table holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Append rows, replacing any existing row with the same `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if any row's embedding has the
    /// wrong length; no rows are written in that case.
    pub async fn insert(&self, rows: impl IntoIterator<Item = VectorRow>) -> Result<()> {
        let rows: Vec<VectorRow> = rows.into_iter().collect();
        if let Some(bad) = rows.iter().find(|r| r.embedding.len() != self.dimensions) {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: bad.embedding.len(),
            });
        }

        let mut stored = self.rows.write().await;
        for row in rows {
            match stored.iter_mut().find(|r| r.id == row.id) {
                Some(existing) => *existing = row,
                None => stored.push(row),
            }
        }
        Ok(())
    }
}

/// Compute cosine distance (`1 - cosine_similarity`) between two vectors.
///
/// The result is clamped to `[0.0, 2.0]`. Returns NaN if either vector has
/// zero magnitude, as pgvector's `<=>` does, so such rows never pass a
/// distance bound.
pub(crate) fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return f32::NAN;
    }
    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 2.0)
}

#[async_trait]
impl VectorTable for InMemoryVectorTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn nearest(&self, query: &VectorQuery<'_>) -> Result<Vec<VectorMatch>> {
        if query.embedding.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.embedding.len(),
            });
        }

        let rows = self.rows.read().await;
        let mut matches: Vec<VectorMatch> = rows
            .iter()
            .filter(|row| query.names.is_empty() || query.names.contains(&row.name))
            .filter_map(|row| {
                let distance = cosine_distance(&row.embedding, query.embedding);
                (distance <= query.max_distance).then(|| VectorMatch {
                    id: row.id.clone(),
                    name: row.name.clone(),
                    document_id: row.document_id.clone(),
                    text: row.text.clone(),
                    distance,
                })
            })
            .collect();

        // sort_by is stable, so ties keep insertion order
        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(query.limit);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str, embedding: Vec<f32>) -> VectorRow {
        VectorRow {
            id: id.to_string(),
            name: name.to_string(),
            document_id: format!("doc_{name}"),
            text: format!("text {id}"),
            embedding,
        }
    }

    fn query<'a>(embedding: &'a [f32], names: &'a [String]) -> VectorQuery<'a> {
        VectorQuery { embedding, names, max_distance: 2.0, limit: 10 }
    }

    #[test]
    fn cosine_distance_bounds() {
        assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
        assert!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]).is_nan());
    }

    #[tokio::test]
    async fn zero_vectors_never_match() {
        let table = InMemoryVectorTable::new("docs", 2);
        table
            .insert([row("zero", "a", vec![0.0, 0.0]), row("unit", "a", vec![0.0, 1.0])])
            .await
            .unwrap();

        // query() admits every finite distance
        let matches = table.nearest(&query(&[1.0, 0.0], &[])).await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["unit"]);

        let matches = table.nearest(&query(&[0.0, 0.0], &[])).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn orders_by_ascending_distance() {
        let table = InMemoryVectorTable::new("docs", 2);
        table
            .insert([
                row("far", "a", vec![0.0, 1.0]),
                row("near", "a", vec![1.0, 0.1]),
                row("mid", "a", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = table.nearest(&query(&[1.0, 0.0], &[])).await.unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
    }

    #[tokio::test]
    async fn filters_on_name_and_distance() {
        let table = InMemoryVectorTable::new("docs", 2);
        table
            .insert([
                row("1", "guide.pdf", vec![1.0, 0.0]),
                row("2", "notes.md", vec![1.0, 0.0]),
                row("3", "guide.pdf", vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let names = vec!["guide.pdf".to_string()];
        let mut q = query(&[1.0, 0.0], &names);
        q.max_distance = 0.5;
        let matches = table.nearest(&q).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "1");
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let table = InMemoryVectorTable::new("docs", 2);
        table
            .insert([row("b", "x", vec![1.0, 0.0]), row("a", "x", vec![1.0, 0.0])])
            .await
            .unwrap();

        let matches = table.nearest(&query(&[1.0, 0.0], &[])).await.unwrap();
        assert_eq!(matches[0].id, "b");
        assert_eq!(matches[1].id, "a");
    }

    #[tokio::test]
    async fn insert_replaces_rows_with_same_id() {
        let table = InMemoryVectorTable::new("docs", 2);
        table.insert([row("1", "x", vec![1.0, 0.0])]).await.unwrap();
        table.insert([row("1", "y", vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(table.len().await, 1);

        let matches = table.nearest(&query(&[0.0, 1.0], &[])).await.unwrap();
        assert_eq!(matches[0].name, "y");
    }

    #[tokio::test]
    async fn rejects_wrong_dimensions() {
        let table = InMemoryVectorTable::new("docs", 3);
        let err = table.insert([row("1", "x", vec![1.0, 0.0])]).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 2 }));
        assert!(table.is_empty().await);

        let err = table.nearest(&query(&[1.0], &[])).await.unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 3, actual: 1 }));
    }
}
