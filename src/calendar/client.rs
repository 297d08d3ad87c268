use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use crate::calendar::feed::{parse_feed, FeedEvent};
use crate::config::CalendarConfig;

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("calendar request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("calendar rejected the event: {0}")]
    Rejected(String),
}

/// A calendar-blocking event written when a booking is confirmed. The label
/// re-uses the west/east keyword convention so the availability aggregator
/// picks the block up on its next read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEvent {
    pub label: String,
    pub description: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Read/write access to the authoritative room calendar.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// All intervals overlapping the half-open window `[start, end)`.
    async fn fetch_intervals(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FeedEvent>, CalendarError>;

    async fn insert_block(&self, block: &BlockEvent) -> Result<(), CalendarError>;
}

/// Production client: reads the calendar's ICS export and writes whole-day
/// events through its JSON API.
#[derive(Clone)]
pub struct HttpCalendarClient {
    http: reqwest::Client,
    feed_url: String,
    events_url: String,
    api_token: String,
}

#[derive(Debug, Serialize)]
struct DayBound {
    date: NaiveDate,
}

#[derive(Debug, Serialize)]
struct InsertEventRequest<'a> {
    summary: &'a str,
    description: &'a str,
    start: DayBound,
    end: DayBound,
}

impl HttpCalendarClient {
    pub fn from_config(config: &CalendarConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            feed_url: config.feed_url.clone(),
            events_url: config.events_url.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl CalendarApi for HttpCalendarClient {
    async fn fetch_intervals(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FeedEvent>, CalendarError> {
        let raw = self
            .http
            .get(&self.feed_url)
            .bearer_auth(&self.api_token)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let intervals: Vec<FeedEvent> = parse_feed(&raw)
            .into_iter()
            .filter(|e| e.start < end && e.end > start)
            .collect();
        Ok(intervals)
    }

    async fn insert_block(&self, block: &BlockEvent) -> Result<(), CalendarError> {
        let request = InsertEventRequest {
            summary: &block.label,
            description: &block.description,
            start: DayBound { date: block.start },
            end: DayBound { date: block.end },
        };

        let response = self
            .http
            .post(&self.events_url)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::Rejected(format!("{status}: {body}")));
        }

        info!(
            "calendar block written: '{}' {}..{}",
            block.label, block.start, block.end
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpCalendarClient {
        HttpCalendarClient::from_config(&CalendarConfig {
            feed_url: format!("{}/feed.ics", server.uri()),
            events_url: format!("{}/events", server.uri()),
            api_token: "test-token".into(),
        })
    }

    #[tokio::test]
    async fn fetch_keeps_only_intervals_overlapping_the_window() {
        let server = MockServer::start().await;
        let ics = "BEGIN:VEVENT\nSUMMARY:West Room - inside\n\
                   DTSTART;VALUE=DATE:20250810\nDTEND;VALUE=DATE:20250812\nEND:VEVENT\n\
                   BEGIN:VEVENT\nSUMMARY:East Room - outside\n\
                   DTSTART;VALUE=DATE:20251001\nDTEND;VALUE=DATE:20251003\nEND:VEVENT\n";
        Mock::given(method("GET"))
            .and(path("/feed.ics"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ics))
            .mount(&server)
            .await;

        let got = client(&server)
            .fetch_intervals(
                NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].label, "West Room - inside");
    }

    #[tokio::test]
    async fn fetch_maps_upstream_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.ics"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server)
            .fetch_intervals(
                NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            )
            .await;
        assert!(matches!(err, Err(CalendarError::Transport(_))));
    }

    #[tokio::test]
    async fn insert_surfaces_rejections() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad event"))
            .mount(&server)
            .await;

        let block = BlockEvent {
            label: "[Booked] West Room - Kim".into(),
            description: "kim@example.com".into(),
            start: NaiveDate::from_ymd_opt(2025, 8, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 8, 12).unwrap(),
        };
        let err = client(&server).insert_block(&block).await;
        assert!(matches!(err, Err(CalendarError::Rejected(_))));
    }
}
