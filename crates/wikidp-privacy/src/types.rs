//! Engine input and output records.

use serde::{Deserialize, Serialize};
use wikidp_core::PrivacyParameters;

use crate::belief::{qual_eps, QualEps, DEFAULT_PRIOR};
use crate::reliability::{aggregation_threshold, confidence_half_width};

/// One ground-truth row from the data source. Immutable input to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthEntry {
    #[serde(rename = "article")]
    pub article_id: String,
    /// Rank assigned by the source, starting at 1.
    #[serde(rename = "gt-rank")]
    pub true_rank: u32,
    #[serde(rename = "gt-views")]
    pub true_count: u64,
}

impl GroundTruthEntry {
    pub fn new(article_id: impl Into<String>, true_rank: u32, true_count: u64) -> Self {
        Self {
            article_id: article_id.into(),
            true_rank,
            true_count,
        }
    }
}

/// A ground-truth row enriched with its noised release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoisedEntry {
    #[serde(flatten)]
    pub truth: GroundTruthEntry,
    #[serde(rename = "dp-views")]
    pub noised_count: u64,
    #[serde(rename = "dp-rank")]
    pub noised_rank: u32,
    /// Whether the noised count is precise enough to publish on its own.
    pub reliable: bool,
}

/// Request-level quality metrics. They depend only on the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseMetrics {
    pub params: PrivacyParameters,
    /// Adversary belief bound for a 50/50 prior at this epsilon.
    pub qual_eps: QualEps,
    /// Half-width of the noise confidence interval, shared by all entries.
    pub confidence_half_width: f64,
    /// Smallest noised count that can be flagged reliable.
    pub aggregation_threshold: f64,
}

impl ReleaseMetrics {
    pub fn for_params(params: &PrivacyParameters) -> Self {
        Self {
            params: *params,
            qual_eps: qual_eps(params.epsilon, DEFAULT_PRIOR),
            confidence_half_width: confidence_half_width(params),
            aggregation_threshold: aggregation_threshold(params),
        }
    }
}

/// Everything released for one request.
#[derive(Debug, Clone)]
pub struct Release {
    pub metrics: ReleaseMetrics,
    /// Entries ordered by `noised_rank` ascending.
    pub entries: Vec<NoisedEntry>,
}

impl Release {
    pub fn reliable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.reliable).count()
    }
}
