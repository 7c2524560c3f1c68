//! Hunt API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use gemhunter_core::{
    hunter, GemRecord, HuntError, HuntReport, KeywordWarning, PlatformError, SearchParameters,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::metrics::HUNT_REQUESTS;
use crate::state::AppState;

/// Size of the highlighted top list.
const TOP_COUNT: usize = 15;

// ============================================================================
// Request/Response types
// ============================================================================

/// Hunt parameters. Omitted fields fall back to the `[hunt]` config section.
#[derive(Debug, Default, Deserialize)]
pub struct HuntRequest {
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub lookback_days: Option<u32>,
    #[serde(default)]
    pub min_views: Option<u64>,
    #[serde(default)]
    pub max_subscribers: Option<u64>,
}

impl HuntRequest {
    pub fn into_parameters(self, defaults: SearchParameters) -> SearchParameters {
        SearchParameters {
            keywords: self.keywords.unwrap_or(defaults.keywords),
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            min_views: self.min_views.unwrap_or(defaults.min_views),
            max_subscribers: self.max_subscribers.unwrap_or(defaults.max_subscribers),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HuntResponse {
    pub run_id: String,
    pub summary: String,
    pub published_after: String,
    pub results: Vec<GemRecord>,
    pub top: Vec<GemRecord>,
    pub warnings: Vec<KeywordWarning>,
    pub stats: HuntStats,
}

#[derive(Debug, Serialize)]
pub struct HuntStats {
    pub keywords_total: usize,
    pub keywords_failed: usize,
    pub gems: usize,
    pub duplicates_dropped: usize,
    pub duration_ms: u64,
}

impl HuntResponse {
    fn from_report(report: HuntReport, max_subscribers: u64) -> Self {
        Self {
            run_id: report.run_id.to_string(),
            summary: report.summary(max_subscribers),
            published_after: report.published_after.clone(),
            top: report.top(TOP_COUNT).to_vec(),
            stats: HuntStats {
                keywords_total: report.keywords_total,
                keywords_failed: report.keywords_failed,
                gems: report.records.len(),
                duplicates_dropped: report.duplicates_dropped,
                duration_ms: report.duration_ms,
            },
            warnings: report.warnings,
            results: report.records,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Keyword being processed when the run was aborted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn hunt_error_response(error: HuntError) -> ApiError {
    let status = match &error {
        HuntError::InvalidParameters(_) => StatusCode::BAD_REQUEST,
        HuntError::Aborted { source, .. } => match source {
            PlatformError::QuotaExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            PlatformError::Unauthorized(_) => StatusCode::BAD_GATEWAY,
            PlatformError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        },
    };
    let keyword = match &error {
        HuntError::Aborted { keyword, .. } => Some(keyword.clone()),
        HuntError::InvalidParameters(_) => None,
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            keyword,
        }),
    )
}

fn outcome_label(error: &HuntError) -> &'static str {
    match error {
        HuntError::InvalidParameters(_) => "invalid",
        HuntError::Aborted { .. } => "aborted",
    }
}

/// Run a hunt with request parameters merged over config defaults.
async fn run_hunt(
    state: &AppState,
    body: HuntRequest,
    format: &str,
) -> Result<(HuntReport, SearchParameters), ApiError> {
    let params = body.into_parameters(state.default_parameters());

    match state.hunter().find_gems(&params).await {
        Ok(report) => {
            HUNT_REQUESTS.with_label_values(&[format, "ok"]).inc();
            Ok((report, params))
        }
        Err(e) => {
            HUNT_REQUESTS
                .with_label_values(&[format, outcome_label(&e)])
                .inc();
            warn!(error = %e, "Hunt request failed");
            Err(hunt_error_response(e))
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/hunt
///
/// Run a hunt and return ranked results as JSON.
pub async fn hunt(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HuntRequest>,
) -> Result<Json<HuntResponse>, ApiError> {
    let (report, params) = run_hunt(&state, body, "json").await?;
    Ok(Json(HuntResponse::from_report(
        report,
        params.max_subscribers,
    )))
}

/// POST /api/v1/hunt/export
///
/// Run a hunt and return the ranked results as a CSV attachment.
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HuntRequest>,
) -> Result<Response, ApiError> {
    let (report, _) = run_hunt(&state, body, "csv").await?;

    let csv = hunter::to_csv_string(&report.records).map_err(|e| {
        error!(error = %e, "Failed to render CSV export");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("CSV export failed: {}", e),
                keyword: None,
            }),
        )
    })?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(Utc::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// `hidden_gems_<YYYYMMDD>.csv`
pub fn export_filename(date: chrono::NaiveDate) -> String {
    format!("hidden_gems_{}.csv", date.format("%Y%m%d"))
}
