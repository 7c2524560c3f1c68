//! Viral score arithmetic.
//!
//! All functions here are pure. The pipeline feeds them raw counts from the
//! statistics endpoints and keeps the results on each [`GemRecord`].
//!
//! [`GemRecord`]: crate::hunter::GemRecord

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numerator of the subscriber factor.
const SUBSCRIBER_SCALE: f64 = 10_000.0;

/// How the channel's subscriber count enters the score.
///
/// Exactly one policy applies to a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmoothingPolicy {
    /// `10000 / (subscribers + constant)`; channels reporting zero
    /// subscribers are not eligible.
    Smoothed { constant: f64 },
    /// `10000 / max(subscribers, 1)`; every channel is eligible.
    Floored,
}

impl Default for SmoothingPolicy {
    fn default() -> Self {
        Self::Smoothed { constant: 1000.0 }
    }
}

impl SmoothingPolicy {
    /// Subscriber count as used for filtering and scoring.
    pub fn effective_subscribers(&self, subscribers: u64) -> u64 {
        match self {
            Self::Smoothed { .. } => subscribers,
            Self::Floored => subscribers.max(1),
        }
    }

    fn constant(&self) -> f64 {
        match self {
            Self::Smoothed { constant } => *constant,
            Self::Floored => 0.0,
        }
    }
}

/// Whole days since publication, never less than 1.
pub fn age_in_days(published_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - published_at).num_days();
    days.clamp(1, u32::MAX as i64) as u32
}

pub fn views_per_day(views: u64, age_in_days: u32) -> f64 {
    views as f64 / age_in_days.max(1) as f64
}

/// `(likes + comments) / views`, or 0 for a video without views.
pub fn engagement_rate(views: u64, likes: u64, comments: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    (likes.saturating_add(comments)) as f64 / views as f64
}

/// `views_per_day * (10000 / (subscribers + K)) * (1 + engagement_rate)`.
///
/// `subscribers` is the raw count; the policy applies its own floor.
pub fn viral_score(
    views_per_day: f64,
    engagement_rate: f64,
    subscribers: u64,
    policy: SmoothingPolicy,
) -> f64 {
    let denominator = policy.effective_subscribers(subscribers) as f64 + policy.constant();
    if denominator <= 0.0 {
        return 0.0;
    }
    views_per_day * (SUBSCRIBER_SCALE / denominator) * (1.0 + engagement_rate)
}

/// Round for display.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
