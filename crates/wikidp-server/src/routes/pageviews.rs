//! Noised pageviews route.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{debug, warn};
use wikidp_core::{Error, QueryArgs, RequestParams};
use wikidp_pageviews::filter_min_count;
use wikidp_privacy::{release, NoisedEntry, QualEps, ReleaseMetrics};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/pageviews", get(get_pageviews))
}

// ---------------------------------------------------------------
// Response types
// ---------------------------------------------------------------

/// Echoed parameters plus the request-level quality metrics.
#[derive(Debug, Serialize)]
pub struct OutParams {
    pub lang: String,
    pub mincount: u64,
    pub eps: f64,
    pub sensitivity: f64,
    pub alpha: f64,
    #[serde(rename = "prop-within")]
    pub prop_within: f64,
    #[serde(rename = "qual-eps")]
    pub qual_eps: QualEps,
    #[serde(rename = "confidence-half-width")]
    pub confidence_half_width: f64,
    #[serde(rename = "aggregate-threshold")]
    pub aggregate_threshold: f64,
}

impl OutParams {
    pub fn new(lang: &str, metrics: &ReleaseMetrics) -> Self {
        let privacy = &metrics.params;
        Self {
            lang: lang.to_string(),
            mincount: privacy.floor,
            eps: privacy.epsilon,
            sensitivity: privacy.sensitivity,
            alpha: privacy.confidence_alpha,
            prop_within: privacy.tolerance_fraction,
            qual_eps: metrics.qual_eps,
            confidence_half_width: metrics.confidence_half_width,
            aggregate_threshold: metrics.aggregation_threshold,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageviewsResponse {
    pub params: OutParams,
    /// Ordered by `dp-rank`.
    pub results: Vec<NoisedEntry>,
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// Parse raw query pairs without ever rejecting the request.
pub(crate) fn request_params(pairs: Vec<(String, String)>) -> RequestParams {
    QueryArgs::from_pairs(pairs).validate()
}

/// GET /api/v1/pageviews — ground truth and noised release side by side.
async fn get_pageviews(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = request_params(pairs);

    let truth = match state
        .source
        .top_articles(&params.lang, state.config.result_limit)
        .await
    {
        Ok(entries) => filter_min_count(entries, params.privacy.floor),
        Err(e) => return upstream_error(&e),
    };

    let mut rng = state.noise_rng();
    let released = release(&truth, &params.privacy, &mut rng);
    debug!(lang = %params.lang, filtered = truth.len(), "Served pageviews release");

    Json(PageviewsResponse {
        params: OutParams::new(&params.lang, &released.metrics),
        results: released.entries,
    })
    .into_response()
}

fn upstream_error(e: &Error) -> Response {
    warn!("Ground truth fetch failed: {}", e);
    let (status, label) = match e {
        Error::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "upstream unavailable"),
        Error::UpstreamPayload(_) => (StatusCode::BAD_GATEWAY, "upstream payload invalid"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
    };
    (
        status,
        Json(serde_json::json!({
            "error": label,
            "detail": e.to_string(),
        })),
    )
        .into_response()
}
