//! Property tests for similarity search over the in-memory vector table.

use std::sync::Arc;

use async_trait::async_trait;
use prompt_rag::{
    EmbeddingProvider, InMemoryVectorTable, Result, SearchConfig, SearchResult, TableRegistry,
    VectorRow, search,
};
use proptest::prelude::*;

const DIM: usize = 8;
const NAMES: [&str; 4] = ["alpha.pdf", "beta.pdf", "gamma.md", "delta.txt"];

/// Embeds every message as the same fixed query vector.
struct QueryEmbedder(Vec<f32>);

#[async_trait]
impl EmbeddingProvider for QueryEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }
}

/// Generate a non-zero L2-normalized embedding.
fn arb_normalized_embedding() -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, DIM).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-3 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

fn arb_rows() -> impl Strategy<Value = Vec<VectorRow>> {
    proptest::collection::vec((0..NAMES.len(), arb_normalized_embedding()), 0..25).prop_map(
        |entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(i, (name_idx, embedding))| VectorRow {
                    id: format!("chunk_{i}"),
                    name: NAMES[name_idx].to_string(),
                    document_id: format!("doc_{name_idx}"),
                    text: format!("text of chunk {i}"),
                    embedding,
                })
                .collect()
        },
    )
}

fn arb_allowed() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(NAMES.to_vec(), 0..=NAMES.len())
        .prop_map(|names| names.into_iter().map(str::to_string).collect())
}

fn run_search(
    rows: Vec<VectorRow>,
    query: Vec<f32>,
    allowed: &[String],
    config: &SearchConfig,
) -> Vec<SearchResult> {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let table = InMemoryVectorTable::new("docs", DIM);
        table.insert(rows).await.unwrap();
        let registry = TableRegistry::new().with_table(Arc::new(table)).unwrap();
        let embedder = QueryEmbedder(query);
        search("query", allowed, &registry, &embedder, "docs", config).await.unwrap()
    })
}

/// *For any* stored rows, query, allow-list, threshold, and limit, search
/// returns at most `top_n` results, each at or above the threshold, ordered
/// by descending similarity, and restricted to allowed names when the
/// allow-list is non-empty.
mod prop_search_contract {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_bounded_thresholded_ordered_and_filtered(
            rows in arb_rows(),
            query in arb_normalized_embedding(),
            allowed in arb_allowed(),
            threshold in 0.0f32..1.0f32,
            top_n in 0usize..10,
        ) {
            let config = SearchConfig::builder()
                .top_n(top_n)
                .similarity_threshold(threshold)
                .build()
                .unwrap();
            let results = run_search(rows, query, &allowed, &config);

            prop_assert!(results.len() <= top_n);

            for r in &results {
                prop_assert!(
                    r.similarity >= threshold - 1e-5,
                    "similarity {} below threshold {}",
                    r.similarity,
                    threshold,
                );
                if !allowed.is_empty() {
                    prop_assert!(allowed.contains(&r.name), "{} not in allow-list", r.name);
                }
            }

            for window in results.windows(2) {
                prop_assert!(
                    window[0].similarity >= window[1].similarity,
                    "results not in descending order: {} < {}",
                    window[0].similarity,
                    window[1].similarity,
                );
            }
        }

        #[test]
        fn empty_allow_list_means_every_document(
            rows in arb_rows(),
            query in arb_normalized_embedding(),
            threshold in 0.0f32..1.0f32,
        ) {
            let config = SearchConfig::builder()
                .top_n(25)
                .similarity_threshold(threshold)
                .build()
                .unwrap();
            let every_name: Vec<String> = NAMES.iter().map(|n| n.to_string()).collect();

            let unrestricted = run_search(rows.clone(), query.clone(), &[], &config);
            let all_allowed = run_search(rows, query, &every_name, &config);

            prop_assert_eq!(unrestricted, all_allowed);
        }
    }
}
