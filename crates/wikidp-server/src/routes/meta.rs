//! Parameter echo and language list routes.

use std::sync::Arc;

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use wikidp_core::languages::{DEFAULT_LANGUAGE, LANGUAGE_CODES};
use wikidp_privacy::ReleaseMetrics;

use super::pageviews::{request_params, OutParams};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/params", get(get_params))
        .route("/languages", get(get_languages))
}

/// GET /api/v1/params — validated parameters and their quality metrics, no upstream call.
async fn get_params(Query(pairs): Query<Vec<(String, String)>>) -> Json<OutParams> {
    let params = request_params(pairs);
    Json(OutParams::new(&params.lang, &ReleaseMetrics::for_params(&params.privacy)))
}

/// GET /api/v1/languages — accepted language codes.
async fn get_languages() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "languages": LANGUAGE_CODES,
        "default": DEFAULT_LANGUAGE,
        "count": LANGUAGE_CODES.len(),
    }))
}
