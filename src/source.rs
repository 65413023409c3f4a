use std::time::Duration;

use async_trait::async_trait;

use crate::error::PollError;
use crate::models::{ActionId, ActionRecord};

pub const UPDATES_PATH: &str = "/api/monitor/updates";

/// Where new action records come from.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Fetch records newer than `cursor`, in the order the server returns them.
    async fn fetch_since(&self, cursor: Option<ActionId>) -> Result<Vec<ActionRecord>, PollError>;
}

pub struct HttpUpdateSource {
    client: reqwest::Client,
    url: String,
}

impl HttpUpdateSource {
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self, PollError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: format!("{}{UPDATES_PATH}", server_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl UpdateSource for HttpUpdateSource {
    async fn fetch_since(&self, cursor: Option<ActionId>) -> Result<Vec<ActionRecord>, PollError> {
        let mut req = self.client.get(&self.url);
        if let Some(since) = cursor {
            req = req.query(&[("since", since)]);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }

        // Read the body first so malformed JSON surfaces as a parse error.
        let body = resp.text().await?;
        let raw: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        Ok(decode_records(raw))
    }
}

/// Decode each element on its own. A record without a usable `id` cannot move
/// the cursor, so it is dropped with a warning instead of failing the batch.
pub fn decode_records(raw: Vec<serde_json::Value>) -> Vec<ActionRecord> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<ActionRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed action record: {e}");
                None
            }
        })
        .collect()
}
