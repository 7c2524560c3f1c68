//! Hunt pipeline integration tests.
//!
//! These run the full pipeline against the mock platform:
//! - Ranking and filtering across several keywords
//! - Batching of statistics requests
//! - Per-keyword failures versus run-aborting failures
//! - Event stream for an aborted run

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Mutex;

use gemhunter_core::{
    hunt_event_channel,
    platform::{ChannelStatistics, PlatformError, SearchHit},
    testing::{fixtures, MockPlatform},
    GemHunter, HuntError, HuntEvent, HunterConfig, KeywordStage, SearchParameters,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 27, 12, 0, 0).unwrap()
}

fn params(keywords: &[&str]) -> SearchParameters {
    SearchParameters {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        lookback_days: 7,
        min_views: 10_000,
        max_subscribers: 3_000,
    }
}

/// Test helper wiring a hunter to a mock platform.
struct TestHarness {
    platform: Arc<MockPlatform>,
    hunter: GemHunter,
    hits: Mutex<HashMap<String, Vec<SearchHit>>>,
}

impl TestHarness {
    fn new() -> Self {
        let platform = Arc::new(MockPlatform::new());
        let hunter = GemHunter::new(
            platform.clone(),
            HunterConfig {
                keyword_delay: Duration::ZERO,
                ..Default::default()
            },
        );
        Self {
            platform,
            hunter,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Register a video under `keyword` with its stats and its channel's
    /// subscriber count. Engagement is always 3%.
    async fn add_video(
        &self,
        keyword: &str,
        video_id: &str,
        channel_id: &str,
        days_ago: i64,
        views: u64,
        subscribers: u64,
    ) {
        let mut hits = self.hits.lock().await;
        let keyword_hits = hits.entry(keyword.to_string()).or_default();
        keyword_hits.push(fixtures::search_hit_at(video_id, channel_id, now(), days_ago));
        self.platform
            .set_search_results(keyword, keyword_hits.clone())
            .await;

        self.platform
            .set_video_statistics(
                video_id,
                fixtures::video_stats(views, views / 50, views / 100),
            )
            .await;
        self.platform
            .set_channel_statistics(
                channel_id,
                ChannelStatistics {
                    subscriber_count: subscribers,
                },
            )
            .await;
    }
}

#[tokio::test]
async fn test_results_ranked_and_filtered() {
    let harness = TestHarness::new();
    harness.add_video("aita", "slow", "c1", 6, 12_000, 2_500).await;
    harness.add_video("aita", "fast", "c2", 1, 80_000, 900).await;
    harness.add_video("aita", "big", "c3", 2, 500_000, 90_000).await;
    harness.add_video("story", "few_views", "c4", 3, 9_999, 100).await;
    harness.add_video("story", "mid", "c5", 3, 40_000, 3_000).await;

    let report = harness
        .hunter
        .find_gems_at(&params(&["aita", "story"]), now())
        .await
        .unwrap();

    let ids: Vec<&str> = report.records.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["fast", "mid", "slow"]);

    for record in &report.records {
        assert!(record.view_count >= 10_000);
        assert!(record.subscriber_count <= 3_000);
        assert!(record.subscriber_count > 0);
    }
    for pair in report.records.windows(2) {
        assert!(pair[0].viral_score >= pair[1].viral_score);
    }
    assert_eq!(report.keywords_total, 2);
    assert_eq!(report.keywords_failed, 0);
}

#[tokio::test]
async fn test_equal_scores_keep_discovery_order() {
    let harness = TestHarness::new();
    harness.add_video("a", "first", "c1", 2, 20_000, 1_000).await;
    harness.add_video("b", "second", "c2", 2, 20_000, 1_000).await;
    harness.add_video("b", "third", "c3", 2, 20_000, 1_000).await;

    let report = harness
        .hunter
        .find_gems_at(&params(&["a", "b"]), now())
        .await
        .unwrap();

    let ids: Vec<&str> = report.records.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_channel_lookup_uses_distinct_ids() {
    let harness = TestHarness::new();
    harness.add_video("aita", "v1", "chan_a", 2, 20_000, 1_000).await;
    harness.add_video("aita", "v2", "chan_b", 2, 20_000, 1_000).await;
    harness.add_video("aita", "v3", "chan_a", 2, 20_000, 1_000).await;

    harness
        .hunter
        .find_gems_at(&params(&["aita"]), now())
        .await
        .unwrap();

    let video_calls = harness.platform.video_statistics_calls().await;
    assert_eq!(video_calls, vec![vec!["v1", "v2", "v3"]]);

    let channel_calls = harness.platform.channel_statistics_calls().await;
    assert_eq!(channel_calls, vec![vec!["chan_a", "chan_b"]]);
}

#[tokio::test]
async fn test_video_found_by_two_keywords_listed_once() {
    let harness = TestHarness::new();
    harness.add_video("aita", "shared", "c1", 2, 20_000, 1_000).await;
    harness.add_video("reddit", "shared", "c1", 2, 20_000, 1_000).await;

    let report = harness
        .hunter
        .find_gems_at(&params(&["aita", "reddit"]), now())
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].keyword, "aita");
    assert_eq!(report.duplicates_dropped, 1);
}

#[tokio::test]
async fn test_network_error_skips_keyword() {
    let harness = TestHarness::new();
    harness.add_video("good", "v1", "c1", 2, 20_000, 1_000).await;
    harness
        .platform
        .set_search_error("flaky", PlatformError::ConnectionFailed("reset".to_string()))
        .await;

    let report = harness
        .hunter
        .find_gems_at(&params(&["flaky", "good"]), now())
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].keyword, "flaky");
    assert_eq!(report.warnings[0].stage, Some(KeywordStage::Search));
    assert_eq!(report.keywords_failed, 1);
    assert_eq!(harness.platform.search_count().await, 2);
}

#[tokio::test]
async fn test_rate_limit_is_not_fatal() {
    let harness = TestHarness::new();
    harness
        .platform
        .set_search_error("a", PlatformError::RateLimited("slow down".to_string()))
        .await;

    let report = harness
        .hunter
        .find_gems_at(&params(&["a", "b"]), now())
        .await
        .unwrap();

    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.warnings[0].kind, "rate_limited");
    assert_eq!(report.warnings[1].kind, "no_results");
    assert_eq!(report.keywords_failed, 1);
}

#[tokio::test]
async fn test_quota_error_aborts_run() {
    let harness = TestHarness::new();
    harness.add_video("first", "v1", "c1", 2, 20_000, 1_000).await;
    harness
        .platform
        .set_search_error("second", PlatformError::QuotaExceeded("daily limit".to_string()))
        .await;
    harness.add_video("third", "v3", "c3", 2, 20_000, 1_000).await;

    let err = harness
        .hunter
        .find_gems_at(&params(&["first", "second", "third"]), now())
        .await
        .unwrap_err();

    match err {
        HuntError::Aborted { keyword, source } => {
            assert_eq!(keyword, "second");
            assert!(source.is_fatal());
        }
        other => panic!("Expected Aborted, got {:?}", other),
    }

    let searched: Vec<String> = harness
        .platform
        .recorded_searches()
        .await
        .into_iter()
        .map(|r| r.keyword)
        .collect();
    assert_eq!(searched, vec!["first", "second"]);
}

#[tokio::test]
async fn test_unauthorized_aborts_with_events() {
    let harness = TestHarness::new();
    harness
        .platform
        .set_search_error("aita", PlatformError::Unauthorized("keyInvalid".to_string()))
        .await;

    let (sender, mut rx) = hunt_event_channel(16);
    let hunter = GemHunter::new(
        harness.platform.clone(),
        HunterConfig {
            keyword_delay: Duration::ZERO,
            ..Default::default()
        },
    )
    .with_events(sender);

    assert!(hunter.find_gems_at(&params(&["aita"]), now()).await.is_err());

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], HuntEvent::Started { total_keywords: 1, .. }));
    match &events[2] {
        HuntEvent::Aborted { keyword, error, .. } => {
            assert_eq!(keyword, "aita");
            assert!(error.contains("keyInvalid"));
        }
        other => panic!("Expected Aborted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_every_keyword_empty() {
    let harness = TestHarness::new();

    let report = harness
        .hunter
        .find_gems_at(&params(&["nothing", "here"]), now())
        .await
        .unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.warnings.len(), 2);
    assert!(report.warnings.iter().all(|w| !w.is_failure()));
    assert_eq!(report.keywords_failed, 0);
    assert!(harness.platform.video_statistics_calls().await.is_empty());
    assert_eq!(
        report.summary(3_000),
        "No videos matched your filters. Try lowering min views or increasing days."
    );
}
