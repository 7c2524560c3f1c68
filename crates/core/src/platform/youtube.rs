//! YouTube Data API v3 client.
//!
//! Uses three endpoints: `search`, `videos` and `channels`. Every call costs
//! quota against the configured key; `search` is by far the most expensive
//! (100 units), the statistics lookups cost 1 unit each.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::YouTubeConfig;
use crate::metrics::{PLATFORM_REQUESTS, PLATFORM_REQUEST_DURATION};

use super::{
    ChannelStatistics, PlatformError, SearchHit, VideoPlatform, VideoSearchRequest,
    VideoStatistics,
};

/// YouTube Data API client.
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Create a new client. Fails if no API key is configured.
    pub fn new(config: &YouTubeConfig) -> Result<Self, PlatformError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(PlatformError::NotConfigured(
                "YouTube API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| PlatformError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Issue a GET against `{base_url}/{resource}` and decode the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, PlatformError> {
        let url = format!("{}/{}", self.base_url, resource);
        let start = Instant::now();

        let result = self.send(&url, params).await;

        let status = if result.is_ok() { "success" } else { "error" };
        PLATFORM_REQUESTS
            .with_label_values(&[resource, status])
            .inc();
        PLATFORM_REQUEST_DURATION
            .with_label_values(&[resource])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, PlatformError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn search_videos(
        &self,
        request: &VideoSearchRequest,
    ) -> Result<Vec<SearchHit>, PlatformError> {
        debug!(
            keyword = %request.keyword,
            published_after = %request.published_after,
            "YouTube search"
        );

        let page_size = request.page_size.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("q", request.keyword.as_str()),
            ("type", "video"),
            ("order", "viewCount"),
            ("publishedAfter", request.published_after.as_str()),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(region) = &request.region_code {
            params.push(("regionCode", region.as_str()));
        }
        if let Some(language) = &request.relevance_language {
            params.push(("relevanceLanguage", language.as_str()));
        }

        let response: SearchListResponse = self.get_json("search", &params).await?;

        let hits: Vec<SearchHit> = response
            .items
            .into_iter()
            .filter_map(SearchItem::into_hit)
            .collect();

        debug!(keyword = %request.keyword, results = hits.len(), "YouTube search complete");
        Ok(hits)
    }

    async fn video_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<HashMap<String, VideoStatistics>, PlatformError> {
        if video_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = video_ids.join(",");
        debug!(count = video_ids.len(), "YouTube video statistics");

        let response: StatisticsListResponse<RawVideoStatistics> = self
            .get_json("videos", &[("part", "statistics"), ("id", ids.as_str())])
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| {
                let stats = item.statistics.unwrap_or_default();
                (
                    item.id,
                    VideoStatistics {
                        view_count: count(stats.view_count),
                        like_count: count(stats.like_count),
                        comment_count: count(stats.comment_count),
                    },
                )
            })
            .collect())
    }

    async fn channel_statistics(
        &self,
        channel_ids: &[String],
    ) -> Result<HashMap<String, ChannelStatistics>, PlatformError> {
        if channel_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = channel_ids.join(",");
        debug!(count = channel_ids.len(), "YouTube channel statistics");

        let response: StatisticsListResponse<RawChannelStatistics> = self
            .get_json("channels", &[("part", "statistics"), ("id", ids.as_str())])
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| {
                let stats = item.statistics.unwrap_or_default();
                let subscriber_count = if stats.hidden_subscriber_count {
                    0
                } else {
                    count(stats.subscriber_count)
                };
                (item.id, ChannelStatistics { subscriber_count })
            })
            .collect())
    }
}

/// Map a non-success response onto the error taxonomy.
///
/// Google APIs report the cause in `error.errors[].reason`; the HTTP status
/// alone does not separate quota exhaustion from other 403s.
fn classify_error(status: StatusCode, body: &str) -> PlatformError {
    let envelope = serde_json::from_str::<GoogleErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| body.chars().take(200).collect());
    let reasons: Vec<String> = envelope
        .map(|e| e.error.errors.into_iter().filter_map(|d| d.reason).collect())
        .unwrap_or_default();
    let has_reason = |wanted: &[&str]| {
        reasons
            .iter()
            .any(|r| wanted.iter().any(|w| r.as_str() == *w))
    };

    if has_reason(&["quotaExceeded", "dailyLimitExceeded"]) {
        return PlatformError::QuotaExceeded(message);
    }
    if status == StatusCode::TOO_MANY_REQUESTS
        || has_reason(&["rateLimitExceeded", "userRateLimitExceeded"])
    {
        return PlatformError::RateLimited(message);
    }
    if status == StatusCode::UNAUTHORIZED
        || has_reason(&[
            "keyInvalid",
            "keyExpired",
            "accessNotConfigured",
            "forbidden",
            "ipRefererBlocked",
        ])
    {
        return PlatformError::Unauthorized(message);
    }

    PlatformError::ApiError {
        status: status.as_u16(),
        message,
    }
}

fn count(raw: Option<RawCount>) -> u64 {
    match raw {
        Some(RawCount::Number(n)) => n,
        Some(RawCount::Text(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    }
}

// ============================================================================
// YouTube API response types (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    published_at: String,
    channel_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl SearchItem {
    /// Drop items that are not videos or lack a parseable publish date.
    fn into_hit(self) -> Option<SearchHit> {
        let video_id = self.id.video_id?;
        let snippet = self.snippet?;
        let published_at = match DateTime::parse_from_rfc3339(&snippet.published_at) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                debug!(video_id = %video_id, error = %e, "Skipping search item with bad publishedAt");
                return None;
            }
        };
        let thumbnails = snippet.thumbnails;
        let thumbnail_url = thumbnails
            .high
            .or(thumbnails.medium)
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        Some(SearchHit {
            video_id,
            title: snippet.title,
            channel_id: snippet.channel_id,
            channel_title: snippet.channel_title,
            published_at,
            thumbnail_url,
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatisticsListResponse<S> {
    #[serde(default)]
    items: Vec<StatisticsItem<S>>,
}

#[derive(Debug, Deserialize)]
struct StatisticsItem<S> {
    id: String,
    statistics: Option<S>,
}

/// Counts arrive as decimal strings; accept plain numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideoStatistics {
    view_count: Option<RawCount>,
    like_count: Option<RawCount>,
    comment_count: Option<RawCount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChannelStatistics {
    subscriber_count: Option<RawCount>,
    #[serde(default)]
    hidden_subscriber_count: bool,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    reason: Option<String>,
}
