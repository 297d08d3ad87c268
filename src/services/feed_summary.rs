//! Secondary read-only channel feed.
//!
//! Advisory, display-only data, so the failure policy is the opposite of the
//! availability aggregator's: an unreachable upstream surfaces as an error
//! instead of degrading to empty, because nobody's booking is blocked by it
//! and silently-empty advisory data is worse than a visible outage.

use chrono::{DateTime, NaiveDate, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::warn;

use crate::calendar::parse_feed;
use crate::config::ChannelFeedConfig;
use crate::error::ApiError;
use crate::redis_client::RedisClient;

const CACHE_KEY: &str = "channel_feed:summary";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedSummary {
    /// Number of date-bounded intervals in the feed.
    pub bookings: usize,
    /// Union of all occupied dates, sorted.
    pub booked_dates: Vec<NaiveDate>,
    pub last_sync: DateTime<Utc>,
}

/// Summarizes raw feed text. Pure; the zero-night and undateable blocks the
/// parser keeps out never reach the date union.
pub fn summarize(raw: &str, now: DateTime<Utc>) -> FeedSummary {
    let events = parse_feed(raw);
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for event in &events {
        let mut date = event.start;
        while date < event.end {
            dates.insert(date);
            date = date.succ_opt().expect("date overflow");
        }
    }
    FeedSummary {
        bookings: events.len(),
        booked_dates: dates.into_iter().collect(),
        last_sync: now,
    }
}

#[derive(Clone)]
pub struct FeedSummaryService {
    http: reqwest::Client,
    redis: RedisClient,
    feed_url: String,
    cache_ttl_seconds: u64,
}

impl FeedSummaryService {
    pub fn from_config(config: &ChannelFeedConfig, redis: RedisClient) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            redis,
            feed_url: config.url.clone(),
            cache_ttl_seconds: config.cache_ttl_seconds,
        }
    }

    /// Cached summary; refreshed from the upstream feed when the TTL lapses.
    pub async fn summary(&self) -> Result<FeedSummary, ApiError> {
        if let Some(cached) = self.cached().await {
            return Ok(cached);
        }

        let raw = self
            .http
            .get(&self.feed_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ApiError::ExternalService(format!("channel feed fetch failed: {e}")))?
            .text()
            .await
            .map_err(|e| ApiError::ExternalService(format!("channel feed read failed: {e}")))?;

        let summary = summarize(&raw, Utc::now());
        self.cache(&summary).await;
        Ok(summary)
    }

    async fn cached(&self) -> Option<FeedSummary> {
        let mut conn = self.redis.conn.clone();
        let data: Option<String> = conn.get(CACHE_KEY).await.ok().flatten();
        data.and_then(|json| serde_json::from_str(&json).ok())
    }

    // Cache trouble is never worth failing the request over.
    async fn cache(&self, summary: &FeedSummary) {
        let Ok(json) = serde_json::to_string(summary) else {
            return;
        };
        let mut conn = self.redis.conn.clone();
        let result: Result<(), _> = conn.set_ex(CACHE_KEY, json, self.cache_ttl_seconds).await;
        if let Err(e) = result {
            warn!("failed to cache channel feed summary: {e}");
        }
    }
}
