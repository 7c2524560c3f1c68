//! Video platform abstraction.
//!
//! The pipeline needs three operations from the hosting platform: a keyword
//! search, a batch video-statistics lookup and a batch channel-statistics
//! lookup. [`VideoPlatform`] captures them; [`YouTubeClient`] implements them
//! against the YouTube Data API v3.

mod types;
mod youtube;

pub use types::*;
pub use youtube::YouTubeClient;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when calling the platform.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// Client not configured (missing API key, bad base URL).
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    /// Daily quota for the credential is used up.
    #[error("API quota exhausted: {0}")]
    QuotaExceeded(String),

    /// Credential rejected (invalid key, API disabled, forbidden).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Short-term rate limit; a later request may succeed.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl PlatformError {
    /// Whether no further request can succeed under the same credential.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured(_) | Self::QuotaExceeded(_) | Self::Unauthorized(_)
        )
    }

    /// Stable label for warnings and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => "not_configured",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::Unauthorized(_) => "unauthorized",
            Self::RateLimited(_) => "rate_limited",
            Self::ConnectionFailed(_) => "connection_failed",
            Self::Timeout => "timeout",
            Self::ApiError { .. } => "api_error",
            Self::ParseError(_) => "parse_error",
        }
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            Self::ParseError(e.to_string())
        } else {
            Self::ConnectionFailed(e.to_string())
        }
    }
}

/// The remote search and statistics provider.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Search videos for one keyword, one page, ordered by view count.
    async fn search_videos(
        &self,
        request: &VideoSearchRequest,
    ) -> Result<Vec<SearchHit>, PlatformError>;

    /// Look up statistics for a batch of videos in a single request.
    ///
    /// Videos the platform no longer knows are absent from the map.
    async fn video_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<HashMap<String, VideoStatistics>, PlatformError>;

    /// Look up subscriber counts for a batch of channels in a single request.
    async fn channel_statistics(
        &self,
        channel_ids: &[String],
    ) -> Result<HashMap<String, ChannelStatistics>, PlatformError>;
}
