//! Configuration for vector similarity search.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Parameters of a single similarity search.
///
/// Deserialization applies the same validation as [`SearchConfigBuilder::build`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawSearchConfig")]
pub struct SearchConfig {
    /// Maximum number of chunks to return. Zero yields an empty result.
    pub top_n: usize,
    /// Minimum similarity (`1 - cosine_distance`) a chunk must reach.
    pub similarity_threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_n: 5, similarity_threshold: 0.7 }
    }
}

impl SearchConfig {
    /// Create a new builder for constructing a [`SearchConfig`].
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Largest cosine distance a row may have and still pass the threshold.
    pub fn max_distance(&self) -> f32 {
        1.0 - self.similarity_threshold
    }
}

/// Unvalidated wire form of [`SearchConfig`]; missing fields take defaults.
#[derive(Deserialize)]
#[serde(default)]
struct RawSearchConfig {
    top_n: usize,
    similarity_threshold: f32,
}

impl Default for RawSearchConfig {
    fn default() -> Self {
        let SearchConfig { top_n, similarity_threshold } = SearchConfig::default();
        Self { top_n, similarity_threshold }
    }
}

impl TryFrom<RawSearchConfig> for SearchConfig {
    type Error = RagError;

    fn try_from(raw: RawSearchConfig) -> Result<Self> {
        SearchConfig::builder()
            .top_n(raw.top_n)
            .similarity_threshold(raw.similarity_threshold)
            .build()
    }
}

/// Builder for constructing a validated [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Set the maximum number of results.
    pub fn top_n(mut self, n: usize) -> Self {
        self.config.top_n = n;
        self
    }

    /// Set the minimum similarity threshold.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Build the [`SearchConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `similarity_threshold` is not a
    /// finite value in `[0.0, 1.0]`.
    pub fn build(self) -> Result<SearchConfig> {
        let threshold = self.config.similarity_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(RagError::ConfigError(format!(
                "similarity_threshold ({threshold}) must be between 0.0 and 1.0"
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_search_contract() {
        let config = SearchConfig::default();
        assert_eq!(config.top_n, 5);
        assert!((config.similarity_threshold - 0.7).abs() < f32::EPSILON);
        assert!((config.max_distance() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn builder_accepts_zero_top_n() {
        let config = SearchConfig::builder().top_n(0).similarity_threshold(0.9).build().unwrap();
        assert_eq!(config.top_n, 0);
    }

    #[test]
    fn builder_rejects_out_of_range_threshold() {
        assert!(SearchConfig::builder().similarity_threshold(1.5).build().is_err());
        assert!(SearchConfig::builder().similarity_threshold(-0.1).build().is_err());
        assert!(SearchConfig::builder().similarity_threshold(f32::NAN).build().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"top_n": 3}"#).unwrap();
        assert_eq!(config.top_n, 3);
        assert!((config.similarity_threshold - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn deserializing_rejects_out_of_range_threshold() {
        let err = serde_json::from_str::<SearchConfig>(r#"{"similarity_threshold": 1.5}"#)
            .unwrap_err();
        assert!(err.to_string().contains("similarity_threshold (1.5)"));
        assert!(serde_json::from_str::<SearchConfig>(r#"{"similarity_threshold": -0.2}"#).is_err());

        let config: SearchConfig =
            serde_json::from_str(r#"{"top_n": 0, "similarity_threshold": 1.0}"#).unwrap();
        assert_eq!(config.max_distance(), 0.0);
    }
}
