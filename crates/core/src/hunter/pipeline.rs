//! Gem hunting pipeline.
//!
//! Keywords are processed one at a time, in order. Per keyword there is one
//! search call, one batch video-statistics call and one batch
//! channel-statistics call, so request volume grows with the keyword count
//! and not with the number of videos found.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::cache::{SearchCache, SearchCacheKey};
use crate::config::Config;
use crate::metrics::{
    GEMS_FOUND, HUNT_DURATION, HUNT_RUNS, KEYWORDS_PROCESSED, SEARCH_CACHE_LOOKUPS,
};
use crate::platform::{PlatformError, SearchHit, VideoPlatform, VideoSearchRequest};
use crate::scoring::{self, SmoothingPolicy};

use super::events::{HuntEvent, HuntEventSender};
use super::types::{
    CandidateVideo, GemRecord, HuntError, HuntReport, KeywordStage, KeywordWarning,
    SearchParameters,
};

/// Settings the pipeline needs from the wider configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HunterConfig {
    /// Search results requested per keyword.
    pub page_size: u32,
    pub region_code: Option<String>,
    pub relevance_language: Option<String>,
    /// Fixed pause between keywords.
    pub keyword_delay: Duration,
    /// Grain the search window start is floored to. Runs inside the same
    /// grain share search cache entries. Zero keeps exact seconds.
    pub window_alignment: Duration,
    pub smoothing: SmoothingPolicy,
}

impl Default for HunterConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            region_code: Some("US".to_string()),
            relevance_language: Some("en".to_string()),
            keyword_delay: Duration::from_millis(250),
            window_alignment: Duration::from_secs(60),
            smoothing: SmoothingPolicy::default(),
        }
    }
}

impl HunterConfig {
    pub fn from_config(config: &Config) -> Self {
        let non_empty = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Self {
            page_size: config.youtube.page_size,
            region_code: non_empty(&config.youtube.region_code),
            relevance_language: non_empty(&config.youtube.relevance_language),
            keyword_delay: Duration::from_millis(config.hunt.keyword_delay_ms),
            window_alignment: Duration::from_secs(config.hunt.window_alignment_secs),
            smoothing: config.scoring.smoothing_policy(),
        }
    }
}

/// What one keyword contributed.
struct KeywordOutcome {
    candidates: usize,
    records: Vec<GemRecord>,
    from_cache: bool,
}

/// Failure while processing one keyword.
struct KeywordFailure {
    stage: KeywordStage,
    error: PlatformError,
}

impl KeywordFailure {
    fn at(stage: KeywordStage) -> impl FnOnce(PlatformError) -> Self {
        move |error| Self { stage, error }
    }
}

/// Finds videos that outperform their channel's size.
pub struct GemHunter {
    platform: Arc<dyn VideoPlatform>,
    config: HunterConfig,
    cache: Option<Arc<dyn SearchCache>>,
    events: Option<HuntEventSender>,
}

impl GemHunter {
    pub fn new(platform: Arc<dyn VideoPlatform>, config: HunterConfig) -> Self {
        Self {
            platform,
            config,
            cache: None,
            events: None,
        }
    }

    /// Memoize searches in `cache`.
    pub fn with_cache(mut self, cache: Arc<dyn SearchCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Publish progress and warnings to `events`.
    pub fn with_events(mut self, events: HuntEventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &HunterConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<dyn SearchCache>> {
        self.cache.as_ref()
    }

    /// Run a hunt using the current time.
    pub async fn find_gems(&self, params: &SearchParameters) -> Result<HuntReport, HuntError> {
        self.find_gems_at(params, Utc::now()).await
    }

    /// Run a hunt with `now` as the reference time for the search window and
    /// video ages.
    pub async fn find_gems_at(
        &self,
        params: &SearchParameters,
        now: DateTime<Utc>,
    ) -> Result<HuntReport, HuntError> {
        if let Err(e) = params.validate() {
            HUNT_RUNS.with_label_values(&["invalid"]).inc();
            return Err(e);
        }

        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let keywords = params.normalized_keywords();
        let total = keywords.len();
        let published_after = published_after(
            align_window(now, self.config.window_alignment),
            params.lookback_days,
        );

        info!(
            run_id = %run_id,
            keywords = total,
            published_after = %published_after,
            min_views = params.min_views,
            max_subscribers = params.max_subscribers,
            "Starting hunt"
        );
        self.emit(HuntEvent::Started {
            run_id,
            total_keywords: total,
            published_after: published_after.clone(),
        });

        let mut records: Vec<GemRecord> = Vec::new();
        let mut warnings: Vec<KeywordWarning> = Vec::new();
        let mut seen_videos: HashSet<String> = HashSet::new();
        let mut keywords_failed = 0;
        let mut duplicates_dropped = 0;

        for (i, keyword) in keywords.iter().enumerate() {
            let index = i + 1;
            self.emit(HuntEvent::KeywordStarted {
                run_id,
                index,
                total,
                keyword: keyword.clone(),
            });

            match self
                .process_keyword(keyword, &published_after, params, now)
                .await
            {
                Ok(outcome) if outcome.candidates == 0 => {
                    KEYWORDS_PROCESSED.with_label_values(&["no_results"]).inc();
                    debug!(run_id = %run_id, keyword = %keyword, "No search results");
                    let warning = KeywordWarning::no_results(keyword);
                    self.emit(HuntEvent::Warning {
                        run_id,
                        index,
                        total,
                        warning: warning.clone(),
                    });
                    warnings.push(warning);
                }
                Ok(outcome) => {
                    KEYWORDS_PROCESSED.with_label_values(&["ok"]).inc();
                    let mut gems = 0;
                    for record in outcome.records {
                        if seen_videos.insert(record.video_id.clone()) {
                            records.push(record);
                            gems += 1;
                        } else {
                            duplicates_dropped += 1;
                        }
                    }
                    info!(
                        run_id = %run_id,
                        keyword = %keyword,
                        candidates = outcome.candidates,
                        gems,
                        from_cache = outcome.from_cache,
                        "Keyword processed ({}/{})",
                        index,
                        total
                    );
                    self.emit(HuntEvent::KeywordCompleted {
                        run_id,
                        index,
                        total,
                        keyword: keyword.clone(),
                        candidates: outcome.candidates,
                        gems,
                        from_cache: outcome.from_cache,
                    });
                }
                Err(failure) if failure.error.is_fatal() => {
                    KEYWORDS_PROCESSED.with_label_values(&["aborted"]).inc();
                    HUNT_RUNS.with_label_values(&["aborted"]).inc();
                    HUNT_DURATION
                        .with_label_values(&["aborted"])
                        .observe(start.elapsed().as_secs_f64());
                    error!(
                        run_id = %run_id,
                        keyword = %keyword,
                        stage = %failure.stage,
                        error = %failure.error,
                        "Aborting hunt"
                    );
                    self.emit(HuntEvent::Aborted {
                        run_id,
                        keyword: keyword.clone(),
                        error: failure.error.to_string(),
                    });
                    return Err(HuntError::Aborted {
                        keyword: keyword.clone(),
                        source: failure.error,
                    });
                }
                Err(failure) => {
                    KEYWORDS_PROCESSED.with_label_values(&["failed"]).inc();
                    keywords_failed += 1;
                    let warning = KeywordWarning::failed(keyword, failure.stage, &failure.error);
                    warn!(
                        run_id = %run_id,
                        keyword = %keyword,
                        stage = %failure.stage,
                        error = %failure.error,
                        "Skipping keyword"
                    );
                    self.emit(HuntEvent::Warning {
                        run_id,
                        index,
                        total,
                        warning: warning.clone(),
                    });
                    warnings.push(warning);
                }
            }

            if index < total && !self.config.keyword_delay.is_zero() {
                tokio::time::sleep(self.config.keyword_delay).await;
            }
        }

        // Stable: equal scores keep discovery order.
        records.sort_by(|a, b| b.viral_score.total_cmp(&a.viral_score));

        let duration_ms = start.elapsed().as_millis() as u64;
        GEMS_FOUND.inc_by(records.len() as u64);
        HUNT_RUNS.with_label_values(&["completed"]).inc();
        HUNT_DURATION
            .with_label_values(&["completed"])
            .observe(start.elapsed().as_secs_f64());

        info!(
            run_id = %run_id,
            gems = records.len(),
            warnings = warnings.len(),
            duration_ms,
            "Hunt finished"
        );
        self.emit(HuntEvent::Finished {
            run_id,
            gems: records.len(),
            warnings: warnings.len(),
            duration_ms,
        });

        Ok(HuntReport {
            run_id,
            published_after,
            records,
            warnings,
            keywords_total: total,
            keywords_failed,
            duplicates_dropped,
            duration_ms,
        })
    }

    /// Search, join statistics, score and filter a single keyword.
    async fn process_keyword(
        &self,
        keyword: &str,
        published_after: &str,
        params: &SearchParameters,
        now: DateTime<Utc>,
    ) -> Result<KeywordOutcome, KeywordFailure> {
        let (hits, from_cache) = self
            .search(keyword, published_after)
            .await
            .map_err(KeywordFailure::at(KeywordStage::Search))?;

        if hits.is_empty() {
            return Ok(KeywordOutcome {
                candidates: 0,
                records: Vec::new(),
                from_cache,
            });
        }

        let candidates: Vec<CandidateVideo> = hits
            .into_iter()
            .map(|hit| CandidateVideo::from_hit(hit, now))
            .collect();

        let video_ids: Vec<String> = candidates.iter().map(|c| c.video_id.clone()).collect();
        let video_stats = self
            .platform
            .video_statistics(&video_ids)
            .await
            .map_err(KeywordFailure::at(KeywordStage::VideoStatistics))?;

        let channel_ids = distinct_channel_ids(&candidates);
        let channel_stats = self
            .platform
            .channel_statistics(&channel_ids)
            .await
            .map_err(KeywordFailure::at(KeywordStage::ChannelStatistics))?;

        let subscribers: HashMap<&str, u64> = channel_stats
            .iter()
            .map(|(id, stats)| (id.as_str(), stats.subscriber_count))
            .collect();

        let candidate_count = candidates.len();
        let records = candidates
            .into_iter()
            .filter_map(|candidate| {
                let stats = video_stats
                    .get(&candidate.video_id)
                    .copied()
                    .unwrap_or_default();
                let raw_subscribers = subscribers
                    .get(candidate.channel_id.as_str())
                    .copied()
                    .unwrap_or(0);
                self.score(candidate, stats, raw_subscribers, keyword, params)
            })
            .collect();

        Ok(KeywordOutcome {
            candidates: candidate_count,
            records,
            from_cache,
        })
    }

    /// Search stage, consulting the cache first when one is configured.
    async fn search(
        &self,
        keyword: &str,
        published_after: &str,
    ) -> Result<(Vec<SearchHit>, bool), PlatformError> {
        let key = SearchCacheKey::new(keyword, published_after);

        if let Some(cache) = &self.cache {
            if let Some(hits) = cache.get(&key) {
                SEARCH_CACHE_LOOKUPS.with_label_values(&["hit"]).inc();
                debug!(keyword = %keyword, results = hits.len(), "Search cache hit");
                return Ok((hits, true));
            }
            SEARCH_CACHE_LOOKUPS.with_label_values(&["miss"]).inc();
        }

        let request = VideoSearchRequest {
            keyword: keyword.to_string(),
            published_after: published_after.to_string(),
            page_size: self.config.page_size,
            region_code: self.config.region_code.clone(),
            relevance_language: self.config.relevance_language.clone(),
        };
        let hits = self.platform.search_videos(&request).await?;

        if let Some(cache) = &self.cache {
            cache.put(key, hits.clone());
        }

        Ok((hits, false))
    }

    /// Derive metrics for one candidate and apply the filters.
    fn score(
        &self,
        candidate: CandidateVideo,
        stats: crate::platform::VideoStatistics,
        raw_subscribers: u64,
        keyword: &str,
        params: &SearchParameters,
    ) -> Option<GemRecord> {
        let policy = self.config.smoothing;
        let subscribers = policy.effective_subscribers(raw_subscribers);

        if !params.accepts(stats.view_count, subscribers) {
            return None;
        }

        let views_per_day = scoring::views_per_day(stats.view_count, candidate.age_in_days);
        let engagement_rate =
            scoring::engagement_rate(stats.view_count, stats.like_count, stats.comment_count);
        let viral_score =
            scoring::viral_score(views_per_day, engagement_rate, raw_subscribers, policy);

        Some(GemRecord {
            video_url: candidate.video_url(),
            video_id: candidate.video_id,
            title: candidate.title,
            channel_id: candidate.channel_id,
            channel_title: candidate.channel_title,
            subscriber_count: subscribers,
            view_count: stats.view_count,
            like_count: stats.like_count,
            comment_count: stats.comment_count,
            views_per_day,
            engagement_rate,
            viral_score,
            age_in_days: candidate.age_in_days,
            published_at: candidate.published_at,
            thumbnail_url: candidate.thumbnail_url,
            keyword: keyword.to_string(),
        })
    }

    fn emit(&self, event: HuntEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

/// `now - lookback_days`, RFC 3339 UTC, whole seconds, trailing `Z`.
pub fn published_after(now: DateTime<Utc>, lookback_days: u32) -> String {
    (now - chrono::Duration::days(lookback_days as i64))
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Floor `now` to a multiple of `alignment` since the epoch.
pub fn align_window(now: DateTime<Utc>, alignment: Duration) -> DateTime<Utc> {
    let grain = alignment.as_secs() as i64;
    if grain <= 1 {
        return now;
    }
    let secs = now.timestamp();
    DateTime::from_timestamp(secs - secs.rem_euclid(grain), 0).unwrap_or(now)
}

/// Channel ids in first-seen order, each once.
fn distinct_channel_ids(candidates: &[CandidateVideo]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| seen.insert(c.channel_id.as_str()))
        .map(|c| c.channel_id.clone())
        .collect()
}
