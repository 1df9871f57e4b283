//! HTTP client for the top-articles endpoint.

use std::time::Duration;

use chrono::{Days, NaiveDate, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use wikidp_core::{Error, Result, WikidpConfig};
use wikidp_privacy::GroundTruthEntry;

use crate::types::TopResponse;

/// Anything that can supply the day's top articles for a language edition.
pub trait GroundTruthSource: Send + Sync {
    fn top_articles<'a>(
        &'a self,
        lang: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<GroundTruthEntry>>>;
}

/// Build the top-articles URL for one edition and day.
pub fn top_articles_url(base_url: &str, lang: &str, date: NaiveDate) -> String {
    format!(
        "{}/metrics/pageviews/top/{}.wikipedia.org/all-access/{}",
        base_url.trim_end_matches('/'),
        lang,
        date.format("%Y/%m/%d")
    )
}

/// Drop entries whose true count is below `min_count`.
pub fn filter_min_count(entries: Vec<GroundTruthEntry>, min_count: u64) -> Vec<GroundTruthEntry> {
    entries
        .into_iter()
        .filter(|e| e.true_count >= min_count)
        .collect()
}

/// Client for the Wikimedia pageviews REST API.
#[derive(Clone)]
pub struct PageviewsClient {
    client: Client,
    base_url: String,
}

enum Attempt {
    Found(Vec<GroundTruthEntry>),
    Status(StatusCode),
}

impl PageviewsClient {
    pub fn new(config: &WikidpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.upstream_base_url.clone(),
        })
    }

    /// Top articles for yesterday (UTC), falling back to the day before when
    /// yesterday's data is not published yet.
    pub async fn fetch_top(&self, lang: &str, limit: usize) -> Result<Vec<GroundTruthEntry>> {
        self.fetch_top_as_of(lang, limit, Utc::now().date_naive()).await
    }

    /// Same as [`fetch_top`](Self::fetch_top) with an explicit "today".
    pub async fn fetch_top_as_of(
        &self,
        lang: &str,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Vec<GroundTruthEntry>> {
        let mut last_status = None;
        for days_back in [1u64, 2] {
            let Some(date) = today.checked_sub_days(Days::new(days_back)) else {
                break;
            };
            match self.fetch_day(lang, date, limit).await? {
                Attempt::Found(entries) => return Ok(entries),
                Attempt::Status(status) => {
                    debug!(lang, %date, %status, "No pageviews for day");
                    last_status = Some(status);
                }
            }
        }

        let status = last_status.map(|s| s.to_string()).unwrap_or_default();
        warn!(lang, %status, "Pageviews unavailable for recent days");
        Err(Error::UpstreamUnavailable(format!(
            "no top articles for {} (last status {})",
            lang, status
        )))
    }

    async fn fetch_day(&self, lang: &str, date: NaiveDate, limit: usize) -> Result<Attempt> {
        let url = top_articles_url(&self.base_url, lang, date);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Pageviews request failed: {}", e);
            Error::UpstreamUnavailable(format!("request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Ok(Attempt::Status(response.status()));
        }

        let body: TopResponse = response
            .json()
            .await
            .map_err(|e| Error::UpstreamPayload(e.to_string()))?;
        Ok(Attempt::Found(body.into_ground_truth(limit)))
    }
}

impl GroundTruthSource for PageviewsClient {
    fn top_articles<'a>(
        &'a self,
        lang: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<GroundTruthEntry>>> {
        self.fetch_top(lang, limit).boxed()
    }
}
