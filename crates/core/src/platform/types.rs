//! Types for the video platform collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters for a keyword search.
///
/// The result kind (videos only) and ordering (by view count) are fixed by
/// the client and not part of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSearchRequest {
    /// Free-text keyword.
    pub keyword: String,
    /// Lower bound on publish time, RFC 3339 UTC with second precision
    /// (e.g. `2025-11-20T08:15:00Z`).
    pub published_after: String,
    /// Results requested (one page).
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_language: Option<String>,
}

/// A single video returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    /// Best available thumbnail, empty if none.
    pub thumbnail_url: String,
}

/// Per-video counters. Missing counters are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatistics {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

/// Per-channel counters. A hidden subscriber count reads as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStatistics {
    pub subscriber_count: u64,
}
