use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::scoring::SmoothingPolicy;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub hunt: HuntConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// YouTube Data API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YouTubeConfig {
    /// API key. Can also be supplied through `YOUTUBE_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    /// Base URL (default: https://www.googleapis.com/youtube/v3)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request deadline in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Search results requested per keyword (default: 10, 10..=15)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_region_code")]
    pub region_code: String,
    #[serde(default = "default_relevance_language")]
    pub relevance_language: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
            region_code: default_region_code(),
            relevance_language: default_relevance_language(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_page_size() -> u32 {
    10
}

fn default_region_code() -> String {
    "US".to_string()
}

fn default_relevance_language() -> String {
    "en".to_string()
}

/// Hunt defaults and pacing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HuntConfig {
    /// Pause between keywords in milliseconds (default: 250)
    #[serde(default = "default_keyword_delay_ms")]
    pub keyword_delay_ms: u64,
    /// Default search window when a request omits it
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_min_views")]
    pub min_views: u64,
    #[serde(default = "default_max_subscribers")]
    pub max_subscribers: u64,
    /// Keywords used when a request does not provide any
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Search window start is floored to this many seconds so that
    /// repeated hunts reuse cached searches (default: 60, 0 = exact)
    #[serde(default = "default_window_alignment_secs")]
    pub window_alignment_secs: u64,
}

impl Default for HuntConfig {
    fn default() -> Self {
        Self {
            keyword_delay_ms: default_keyword_delay_ms(),
            lookback_days: default_lookback_days(),
            min_views: default_min_views(),
            max_subscribers: default_max_subscribers(),
            keywords: default_keywords(),
            window_alignment_secs: default_window_alignment_secs(),
        }
    }
}

fn default_keyword_delay_ms() -> u64 {
    250
}

fn default_window_alignment_secs() -> u64 {
    60
}

fn default_lookback_days() -> u32 {
    7
}

fn default_min_views() -> u64 {
    10_000
}

fn default_max_subscribers() -> u64 {
    3_000
}

fn default_keywords() -> Vec<String> {
    [
        "AITA update",
        "Reddit update",
        "cheating story",
        "surviving infidelity",
        "open marriage fail",
        "wife cheated",
        "husband cheated",
        "reddit cheating stories",
        "exposed cheater",
        "emotional affair",
        "reddit relationship advice",
        "true off my chest",
        "reddit stories",
        "aita",
        "relationship_advice",
        "infidelity",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

/// Which subscriber smoothing the viral score uses
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingKind {
    /// Add `smoothing_constant` to the subscriber count, drop zero-subscriber channels.
    #[default]
    Smoothed,
    /// No constant, subscriber count floored to 1.
    Floored,
}

/// Viral score configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub policy: SmoothingKind,
    #[serde(default = "default_smoothing_constant")]
    pub smoothing_constant: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            policy: SmoothingKind::default(),
            smoothing_constant: default_smoothing_constant(),
        }
    }
}

impl ScoringConfig {
    pub fn smoothing_policy(&self) -> SmoothingPolicy {
        match self.policy {
            SmoothingKind::Smoothed => SmoothingPolicy::Smoothed {
                constant: self.smoothing_constant,
            },
            SmoothingKind::Floored => SmoothingPolicy::Floored,
        }
    }
}

fn default_smoothing_constant() -> f64 {
    1000.0
}

/// Search cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Entry lifetime in seconds (default: 3600)
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_max_entries(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    512
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub youtube: SanitizedYouTubeConfig,
    pub hunt: HuntConfig,
    pub scoring: ScoringConfig,
    pub cache: CacheConfig,
}

/// Sanitized YouTube config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedYouTubeConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub page_size: u32,
    pub region_code: String,
    pub relevance_language: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            youtube: SanitizedYouTubeConfig {
                base_url: config.youtube.base_url.clone(),
                api_key_configured: !config.youtube.api_key.trim().is_empty(),
                timeout_secs: config.youtube.timeout_secs,
                page_size: config.youtube.page_size,
                region_code: config.youtube.region_code.clone(),
                relevance_language: config.youtube.relevance_language.clone(),
            },
            hunt: config.hunt.clone(),
            scoring: config.scoring.clone(),
            cache: config.cache.clone(),
        }
    }
}
