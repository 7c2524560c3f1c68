//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Platform calls (search, video and channel statistics)
//! - Hunt runs (keywords processed, gems found, run duration)
//! - Search cache effectiveness

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Platform Metrics
// =============================================================================

/// Platform requests total by endpoint and result.
pub static PLATFORM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gemhunter_platform_requests_total",
            "Total requests sent to the video platform",
        ),
        &["operation", "status"], // operation: "search", "videos", "channels"
    )
    .unwrap()
});

/// Platform request duration in seconds.
pub static PLATFORM_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "gemhunter_platform_request_duration_seconds",
            "Duration of video platform requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Hunt Metrics
// =============================================================================

/// Keywords processed by outcome.
pub static KEYWORDS_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gemhunter_keywords_processed_total",
            "Keywords processed by hunt runs",
        ),
        &["outcome"], // "ok", "no_results", "failed", "aborted"
    )
    .unwrap()
});

/// Gems found total.
pub static GEMS_FOUND: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "gemhunter_gems_found_total",
        "Total records that passed the filters",
    )
    .unwrap()
});

/// Hunt runs by result.
pub static HUNT_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("gemhunter_hunt_runs_total", "Total hunt runs"),
        &["result"], // "completed", "aborted", "invalid"
    )
    .unwrap()
});

/// Hunt run duration in seconds.
pub static HUNT_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "gemhunter_hunt_duration_seconds",
            "Duration of complete hunt runs",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Cache Metrics
// =============================================================================

/// Search cache lookups by result.
pub static SEARCH_CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gemhunter_search_cache_lookups_total",
            "Search cache lookups",
        ),
        &["result"], // "hit", "miss"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Platform
        Box::new(PLATFORM_REQUESTS.clone()),
        Box::new(PLATFORM_REQUEST_DURATION.clone()),
        // Hunt
        Box::new(KEYWORDS_PROCESSED.clone()),
        Box::new(GEMS_FOUND.clone()),
        Box::new(HUNT_RUNS.clone()),
        Box::new(HUNT_DURATION.clone()),
        // Cache
        Box::new(SEARCH_CACHE_LOOKUPS.clone()),
    ]
}
