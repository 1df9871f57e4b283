//! Ground-truth pageviews source.
//!
//! Fetches the daily top articles of a Wikipedia edition from the Wikimedia
//! REST API. The rest of the system sees it only through
//! [`GroundTruthSource`], so handlers can be exercised against a stub.

pub mod client;
pub mod types;

pub use client::{filter_min_count, top_articles_url, GroundTruthSource, PageviewsClient};
pub use types::*;
