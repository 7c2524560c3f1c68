//! Types for the gem hunting pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::platform::{PlatformError, SearchHit};
use crate::scoring;

/// Watch URL prefix for result links.
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Filter parameters for one hunt run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Keywords searched in order.
    pub keywords: Vec<String>,
    /// Only videos published within this many days.
    pub lookback_days: u32,
    /// Inclusive lower bound on views.
    pub min_views: u64,
    /// Inclusive upper bound on channel subscribers.
    pub max_subscribers: u64,
}

impl SearchParameters {
    /// Keywords trimmed, with blanks removed. Order is kept.
    pub fn normalized_keywords(&self) -> Vec<String> {
        self.keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<(), HuntError> {
        if self.lookback_days == 0 {
            return Err(HuntError::InvalidParameters(
                "lookback_days must be at least 1".to_string(),
            ));
        }
        if self.normalized_keywords().is_empty() {
            return Err(HuntError::InvalidParameters(
                "at least one non-empty keyword is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Filter predicate. `subscribers` is the count after the smoothing
    /// policy's floor has been applied.
    pub fn accepts(&self, views: u64, subscribers: u64) -> bool {
        views >= self.min_views && subscribers <= self.max_subscribers && subscribers > 0
    }
}

/// A search hit with its age resolved against the run's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateVideo {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    /// Whole days since publication, at least 1.
    pub age_in_days: u32,
    pub thumbnail_url: String,
}

impl CandidateVideo {
    pub fn from_hit(hit: SearchHit, now: DateTime<Utc>) -> Self {
        Self {
            age_in_days: scoring::age_in_days(hit.published_at, now),
            video_id: hit.video_id,
            title: hit.title,
            channel_id: hit.channel_id,
            channel_title: hit.channel_title,
            published_at: hit.published_at,
            thumbnail_url: hit.thumbnail_url,
        }
    }

    pub fn video_url(&self) -> String {
        format!("{}{}", WATCH_URL_PREFIX, self.video_id)
    }
}

/// A video that passed the filters, with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemRecord {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub views_per_day: f64,
    /// Fraction, not percent.
    pub engagement_rate: f64,
    /// Full precision; round for display.
    pub viral_score: f64,
    pub age_in_days: u32,
    pub published_at: DateTime<Utc>,
    pub video_url: String,
    pub thumbnail_url: String,
    /// Keyword that surfaced the video.
    pub keyword: String,
}

impl GemRecord {
    pub fn display_score(&self) -> f64 {
        scoring::round_to(self.viral_score, 2)
    }

    pub fn engagement_percent(&self) -> f64 {
        scoring::round_to(self.engagement_rate * 100.0, 2)
    }
}

/// Pipeline stage at which a keyword failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordStage {
    Search,
    VideoStatistics,
    ChannelStatistics,
}

impl std::fmt::Display for KeywordStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Search => "search",
            Self::VideoStatistics => "video_statistics",
            Self::ChannelStatistics => "channel_statistics",
        };
        f.write_str(s)
    }
}

/// Non-fatal problem with one keyword. The run continued without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordWarning {
    pub keyword: String,
    /// `None` when the search simply returned nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<KeywordStage>,
    /// `no_results` or a platform error kind such as `timeout`.
    pub kind: String,
    pub message: String,
}

impl KeywordWarning {
    pub fn no_results(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            stage: None,
            kind: "no_results".to_string(),
            message: format!("No videos found for '{}'", keyword),
        }
    }

    pub fn failed(keyword: &str, stage: KeywordStage, error: &PlatformError) -> Self {
        Self {
            keyword: keyword.to_string(),
            stage: Some(stage),
            kind: error.kind().to_string(),
            message: format!("Error with '{}' during {}: {}", keyword, stage, error),
        }
    }

    /// Whether the keyword failed, as opposed to returning nothing.
    pub fn is_failure(&self) -> bool {
        self.stage.is_some()
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntReport {
    pub run_id: Uuid,
    /// Lower publish-time bound used for every search in the run.
    pub published_after: String,
    /// Sorted by viral score, highest first.
    pub records: Vec<GemRecord>,
    pub warnings: Vec<KeywordWarning>,
    pub keywords_total: usize,
    pub keywords_failed: usize,
    /// Videos surfaced again by a later keyword and not repeated.
    pub duplicates_dropped: usize,
    pub duration_ms: u64,
}

impl HuntReport {
    /// The best `n` records.
    pub fn top(&self, n: usize) -> &[GemRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// One-line human summary of the run.
    pub fn summary(&self, max_subscribers: u64) -> String {
        if self.records.is_empty() {
            "No videos matched your filters. Try lowering min views or increasing days."
                .to_string()
        } else {
            format!(
                "Found {} potential viral videos under {} subs",
                self.records.len(),
                max_subscribers
            )
        }
    }
}

/// Errors that end a hunt run.
#[derive(Debug, Error)]
pub enum HuntError {
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),

    /// A quota or credential failure; no later keyword could succeed.
    #[error("Hunt aborted at keyword '{keyword}': {source}")]
    Aborted {
        keyword: String,
        #[source]
        source: PlatformError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn params(keywords: &[&str]) -> SearchParameters {
        SearchParameters {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            lookback_days: 7,
            min_views: 10_000,
            max_subscribers: 3_000,
        }
    }

    #[test]
    fn test_normalized_keywords() {
        let p = params(&["  aita ", "", "   ", "reddit update"]);
        assert_eq!(p.normalized_keywords(), vec!["aita", "reddit update"]);
    }

    #[test]
    fn test_validate() {
        assert!(params(&["aita"]).validate().is_ok());
        assert!(matches!(
            params(&["", " "]).validate(),
            Err(HuntError::InvalidParameters(_))
        ));

        let mut p = params(&["aita"]);
        p.lookback_days = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_accepts_inclusive_bounds() {
        let p = params(&["aita"]);
        assert!(p.accepts(10_000, 3_000));
        assert!(!p.accepts(9_999, 3_000));
        assert!(!p.accepts(10_000, 3_001));
        assert!(!p.accepts(10_000, 0));
    }

    #[test]
    fn test_candidate_from_fresh_hit() {
        let hit = fixtures::search_hit("v1", "c1", 0);
        let candidate = CandidateVideo::from_hit(hit, Utc::now());
        assert_eq!(candidate.age_in_days, 1);
        assert_eq!(candidate.video_url(), "https://www.youtube.com/watch?v=v1");
    }

    #[test]
    fn test_warning_constructors() {
        let w = KeywordWarning::no_results("aita");
        assert!(!w.is_failure());
        assert_eq!(w.kind, "no_results");

        let w = KeywordWarning::failed("aita", KeywordStage::Search, &PlatformError::Timeout);
        assert!(w.is_failure());
        assert_eq!(w.kind, "timeout");
        assert!(w.message.contains("aita"));
        assert!(w.message.contains("search"));
    }

    #[test]
    fn test_report_top_and_summary() {
        let report = HuntReport {
            run_id: Uuid::new_v4(),
            published_after: "2025-11-20T08:15:00Z".to_string(),
            records: vec![
                fixtures::gem_record("v1", 30.0),
                fixtures::gem_record("v2", 20.0),
            ],
            warnings: vec![],
            keywords_total: 1,
            keywords_failed: 0,
            duplicates_dropped: 0,
            duration_ms: 5,
        };

        assert_eq!(report.top(1).len(), 1);
        assert_eq!(report.top(15).len(), 2);
        assert_eq!(
            report.summary(3_000),
            "Found 2 potential viral videos under 3000 subs"
        );
    }
}
