//! Mock video platform for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::platform::{
    ChannelStatistics, PlatformError, SearchHit, VideoPlatform, VideoSearchRequest,
    VideoStatistics,
};

/// Mock implementation of the VideoPlatform trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable hits per keyword (unknown keywords return nothing)
/// - Serve statistics from in-memory maps; unknown ids are absent
/// - Fail a given keyword's search, or every statistics call of one kind
/// - Record each request for assertions
///
/// # Example
///
/// ```rust,ignore
/// use gemhunter_core::testing::{MockPlatform, fixtures};
///
/// let platform = MockPlatform::new();
/// platform.set_search_results("aita", vec![fixtures::search_hit("v1", "c1", 3)]).await;
/// platform.set_video_statistics("v1", fixtures::video_stats(50_000, 1_000, 500)).await;
/// platform.set_channel_statistics("c1", ChannelStatistics { subscriber_count: 2_000 }).await;
///
/// let hunter = GemHunter::new(Arc::new(platform), HunterConfig::default());
/// ```
pub struct MockPlatform {
    /// Hits returned per keyword.
    search_results: Arc<RwLock<HashMap<String, Vec<SearchHit>>>>,
    /// Errors returned per keyword instead of hits.
    search_errors: Arc<RwLock<HashMap<String, PlatformError>>>,
    video_stats: Arc<RwLock<HashMap<String, VideoStatistics>>>,
    channel_stats: Arc<RwLock<HashMap<String, ChannelStatistics>>>,
    /// If set, every video statistics call fails with this error.
    video_stats_error: Arc<RwLock<Option<PlatformError>>>,
    /// If set, every channel statistics call fails with this error.
    channel_stats_error: Arc<RwLock<Option<PlatformError>>>,
    searches: Arc<RwLock<Vec<VideoSearchRequest>>>,
    video_calls: Arc<RwLock<Vec<Vec<String>>>>,
    channel_calls: Arc<RwLock<Vec<Vec<String>>>>,
}

impl std::fmt::Debug for MockPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPlatform")
            .field("search_results", &"<results>")
            .field("searches", &"<searches>")
            .finish_non_exhaustive()
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            search_results: Arc::new(RwLock::new(HashMap::new())),
            search_errors: Arc::new(RwLock::new(HashMap::new())),
            video_stats: Arc::new(RwLock::new(HashMap::new())),
            channel_stats: Arc::new(RwLock::new(HashMap::new())),
            video_stats_error: Arc::new(RwLock::new(None)),
            channel_stats_error: Arc::new(RwLock::new(None)),
            searches: Arc::new(RwLock::new(Vec::new())),
            video_calls: Arc::new(RwLock::new(Vec::new())),
            channel_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the hits returned for `keyword`.
    pub async fn set_search_results(&self, keyword: &str, hits: Vec<SearchHit>) {
        self.search_results
            .write()
            .await
            .insert(keyword.to_string(), hits);
    }

    /// Make searches for `keyword` fail with `error`.
    pub async fn set_search_error(&self, keyword: &str, error: PlatformError) {
        self.search_errors
            .write()
            .await
            .insert(keyword.to_string(), error);
    }

    pub async fn clear_search_error(&self, keyword: &str) {
        self.search_errors.write().await.remove(keyword);
    }

    pub async fn set_video_statistics(&self, video_id: &str, stats: VideoStatistics) {
        self.video_stats
            .write()
            .await
            .insert(video_id.to_string(), stats);
    }

    pub async fn set_channel_statistics(&self, channel_id: &str, stats: ChannelStatistics) {
        self.channel_stats
            .write()
            .await
            .insert(channel_id.to_string(), stats);
    }

    pub async fn set_video_statistics_error(&self, error: PlatformError) {
        *self.video_stats_error.write().await = Some(error);
    }

    pub async fn set_channel_statistics_error(&self, error: PlatformError) {
        *self.channel_stats_error.write().await = Some(error);
    }

    /// Search requests in the order they were made.
    pub async fn recorded_searches(&self) -> Vec<VideoSearchRequest> {
        self.searches.read().await.clone()
    }

    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Id lists passed to each video statistics call.
    pub async fn video_statistics_calls(&self) -> Vec<Vec<String>> {
        self.video_calls.read().await.clone()
    }

    /// Id lists passed to each channel statistics call.
    pub async fn channel_statistics_calls(&self) -> Vec<Vec<String>> {
        self.channel_calls.read().await.clone()
    }

    /// Forget recorded calls.
    pub async fn clear_recorded(&self) {
        self.searches.write().await.clear();
        self.video_calls.write().await.clear();
        self.channel_calls.write().await.clear();
    }
}

#[async_trait]
impl VideoPlatform for MockPlatform {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search_videos(
        &self,
        request: &VideoSearchRequest,
    ) -> Result<Vec<SearchHit>, PlatformError> {
        self.searches.write().await.push(request.clone());

        if let Some(error) = self.search_errors.read().await.get(&request.keyword) {
            return Err(error.clone());
        }

        let hits = self
            .search_results
            .read()
            .await
            .get(&request.keyword)
            .cloned()
            .unwrap_or_default();

        Ok(hits
            .into_iter()
            .take(request.page_size as usize)
            .collect())
    }

    async fn video_statistics(
        &self,
        video_ids: &[String],
    ) -> Result<HashMap<String, VideoStatistics>, PlatformError> {
        self.video_calls.write().await.push(video_ids.to_vec());

        if let Some(error) = self.video_stats_error.read().await.clone() {
            return Err(error);
        }

        let stats = self.video_stats.read().await;
        Ok(video_ids
            .iter()
            .filter_map(|id| stats.get(id).map(|s| (id.clone(), *s)))
            .collect())
    }

    async fn channel_statistics(
        &self,
        channel_ids: &[String],
    ) -> Result<HashMap<String, ChannelStatistics>, PlatformError> {
        self.channel_calls.write().await.push(channel_ids.to_vec());

        if let Some(error) = self.channel_stats_error.read().await.clone() {
            return Err(error);
        }

        let stats = self.channel_stats.read().await;
        Ok(channel_ids
            .iter()
            .filter_map(|id| stats.get(id).map(|s| (id.clone(), *s)))
            .collect())
    }
}
