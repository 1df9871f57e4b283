//! Wire types of the Wikimedia top-articles endpoint.

use serde::Deserialize;
use wikidp_privacy::GroundTruthEntry;

/// `GET /metrics/pageviews/top/{project}/{access}/{year}/{month}/{day}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopResponse {
    #[serde(default)]
    pub items: Vec<TopProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopProject {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub articles: Vec<TopArticle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopArticle {
    pub article: String,
    pub views: u64,
    pub rank: u32,
}

impl TopResponse {
    /// Ground truth from the first project, in source order, at most `limit` rows.
    pub fn into_ground_truth(self, limit: usize) -> Vec<GroundTruthEntry> {
        self.items
            .into_iter()
            .next()
            .map(|project| {
                project
                    .articles
                    .into_iter()
                    .take(limit)
                    .map(|a| GroundTruthEntry::new(a.article, a.rank, a.views))
                    .collect()
            })
            .unwrap_or_default()
    }
}
