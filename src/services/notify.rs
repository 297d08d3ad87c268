use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use crate::config::NotifyConfig;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay rejected the message: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Fire-and-forget message delivery. Callers log failures and move on; a
/// notification outage must never reverse a committed lifecycle transition.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError>;
}

/// Production impl: POSTs to a transactional mail relay.
#[derive(Clone)]
pub struct HttpNotifier {
    http: reqwest::Client,
    endpoint: String,
    api_token: String,
    from_address: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl HttpNotifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            from_address: config.from_address.clone(),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotifyError> {
        let request = SendRequest {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            body: &message.body,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!("{status}: {body}")));
        }

        info!("notification sent to {}: '{}'", message.to, message.subject);
        Ok(())
    }
}
