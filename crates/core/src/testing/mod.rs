//! Testing utilities and a mock video platform.
//!
//! Lets the hunt pipeline and the HTTP layer run end to end without network
//! access or API quota.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemhunter_core::testing::{MockPlatform, fixtures};
//!
//! let platform = MockPlatform::new();
//! platform.set_search_results("aita", vec![fixtures::search_hit("v1", "c1", 3)]).await;
//!
//! // Use in GemHunter or AppState...
//! ```

mod mock_platform;

pub use mock_platform::MockPlatform;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Duration, Utc};

    use crate::hunter::{GemRecord, WATCH_URL_PREFIX};
    use crate::platform::{SearchHit, VideoStatistics};

    /// A search hit published `days_ago` days before now.
    pub fn search_hit(video_id: &str, channel_id: &str, days_ago: i64) -> SearchHit {
        search_hit_at(video_id, channel_id, Utc::now(), days_ago)
    }

    /// A search hit published `days_ago` days before `now`.
    pub fn search_hit_at(
        video_id: &str,
        channel_id: &str,
        now: DateTime<Utc>,
        days_ago: i64,
    ) -> SearchHit {
        SearchHit {
            video_id: video_id.to_string(),
            title: format!("Video {}", video_id),
            channel_id: channel_id.to_string(),
            channel_title: format!("Channel {}", channel_id),
            published_at: now - Duration::days(days_ago),
            thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id),
        }
    }

    pub fn video_stats(views: u64, likes: u64, comments: u64) -> VideoStatistics {
        VideoStatistics {
            view_count: views,
            like_count: likes,
            comment_count: comments,
        }
    }

    /// A gem record with the given score and plausible other fields.
    pub fn gem_record(video_id: &str, viral_score: f64) -> GemRecord {
        GemRecord {
            video_id: video_id.to_string(),
            title: format!("Video {}", video_id),
            channel_id: "chan".to_string(),
            channel_title: "Small Channel".to_string(),
            subscriber_count: 2_000,
            view_count: 50_000,
            like_count: 1_000,
            comment_count: 500,
            views_per_day: 10_000.0,
            engagement_rate: 0.03,
            viral_score,
            age_in_days: 5,
            published_at: Utc::now() - Duration::days(5),
            video_url: format!("{}{}", WATCH_URL_PREFIX, video_id),
            thumbnail_url: String::new(),
            keyword: "aita".to_string(),
        }
    }
}
