//! Cached front end for the summary operations.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::dataset::Dataset;

use super::cache::{Cache, InMemoryCache};
use super::chart::{chart_with_default_limit, ChartConfig, ChartDataset, ChartType};
use super::summary::{statistics_with_limit, summary_with_limit, DataSummary, StatisticalSummary};
use super::DEFAULT_MAX_DATA_POINTS;

/// Hex characters of the content hash that go into cache keys.
const HASH_PREFIX_LEN: usize = 12;
/// Hex characters of the configuration digest that go into cache keys.
const FINGERPRINT_LEN: usize = 16;

/// Options for [`DataAnalyzer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Records considered per summary or chart.
    pub max_data_points: usize,
    /// Lifetime of cached results, in seconds.
    pub cache_ttl_secs: u64,
}

impl AnalysisOptions {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_data_points: DEFAULT_MAX_DATA_POINTS,
            cache_ttl_secs: 300,
        }
    }
}

/// Any result the analyzer caches.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutput {
    Summary(DataSummary),
    Statistics(StatisticalSummary),
    Chart(ChartDataset),
}

/// Computes summaries, statistics and charts, memoizing them in a [`Cache`].
///
/// Keys are `<dataset key>:<hash prefix>:<kind>:<config fingerprint>`, so re-ingested content
/// never hits a stale entry.
#[derive(Clone)]
pub struct DataAnalyzer {
    cache: Arc<dyn Cache<AnalysisOutput>>,
    options: AnalysisOptions,
}

impl fmt::Debug for DataAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataAnalyzer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for DataAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisOptions::default())
    }
}

impl DataAnalyzer {
    /// Analyzer with a private [`InMemoryCache`].
    pub fn new(options: AnalysisOptions) -> Self {
        Self::with_cache(options, Arc::new(InMemoryCache::new()))
    }

    /// Analyzer backed by a caller-provided cache.
    pub fn with_cache(options: AnalysisOptions, cache: Arc<dyn Cache<AnalysisOutput>>) -> Self {
        Self { cache, options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    #[tracing::instrument(level = "debug", skip_all, fields(dataset = dataset.key()))]
    pub fn summary(&self, dataset: &Dataset) -> DataSummary {
        let key = self.cache_key(dataset, "summary", &self.options.max_data_points);
        if let Some(AnalysisOutput::Summary(s)) = self.lookup(&key) {
            return s;
        }
        let s = summary_with_limit(dataset, self.options.max_data_points);
        self.store(&key, AnalysisOutput::Summary(s.clone()));
        s
    }

    #[tracing::instrument(level = "debug", skip_all, fields(dataset = dataset.key()))]
    pub fn statistics(&self, dataset: &Dataset) -> StatisticalSummary {
        let key = self.cache_key(dataset, "statistics", &self.options.max_data_points);
        if let Some(AnalysisOutput::Statistics(s)) = self.lookup(&key) {
            return s;
        }
        let s = statistics_with_limit(dataset, self.options.max_data_points);
        self.store(&key, AnalysisOutput::Statistics(s.clone()));
        s
    }

    #[tracing::instrument(level = "debug", skip_all, fields(dataset = dataset.key(), chart = %chart_type))]
    pub fn chart(&self, dataset: &Dataset, chart_type: ChartType, config: &ChartConfig) -> ChartDataset {
        let kind = format!("chart-{chart_type}");
        let key = self.cache_key(dataset, &kind, &(config, self.options.max_data_points));
        if let Some(AnalysisOutput::Chart(c)) = self.lookup(&key) {
            return c;
        }
        let c = chart_with_default_limit(dataset, chart_type, config, self.options.max_data_points);
        self.store(&key, AnalysisOutput::Chart(c.clone()));
        c
    }

    fn lookup(&self, key: &str) -> Option<AnalysisOutput> {
        let hit = self.cache.get(key);
        tracing::debug!(key, hit = hit.is_some(), "analysis cache lookup");
        hit
    }

    fn store(&self, key: &str, value: AnalysisOutput) {
        self.cache.set(key, value, self.options.cache_ttl());
    }

    fn cache_key(&self, dataset: &Dataset, kind: &str, config: &impl Serialize) -> String {
        let hash_prefix: String = dataset.content_hash.chars().take(HASH_PREFIX_LEN).collect();
        format!("{}:{hash_prefix}:{kind}:{}", dataset.key(), config_fingerprint(config))
    }
}

/// Short digest of a configuration value.
pub fn config_fingerprint(config: &impl Serialize) -> String {
    let encoded = serde_json::to_vec(config).unwrap_or_default();
    let mut digest = hex::encode(Sha256::digest(&encoded));
    digest.truncate(FINGERPRINT_LEN);
    digest
}
