use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use gemhunter_core::{SanitizedConfig, SearchCacheStats};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub enabled: bool,
    #[serde(flatten)]
    pub stats: SearchCacheStats,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// GET /api/v1/cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    let response = match state.cache() {
        Some(cache) => CacheStatsResponse {
            enabled: true,
            stats: cache.stats(),
        },
        None => CacheStatsResponse {
            enabled: false,
            stats: SearchCacheStats::default(),
        },
    };
    Json(response)
}

/// DELETE /api/v1/cache
///
/// Drop all memoized searches.
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    let message = match state.cache() {
        Some(cache) => {
            cache.clear();
            tracing::info!("Search cache cleared");
            "Search cache cleared"
        }
        None => "Search cache disabled",
    };
    Json(SuccessResponse {
        message: message.to_string(),
    })
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
