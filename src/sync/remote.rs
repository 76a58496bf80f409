//! Remote endpoint client
//!
//! Talks to the mock quote endpoint: GET returns a JSON array of items
//! with at least a `title` field, POST receives the merged collection and
//! its response is ignored.

use crate::types::{Quote, QuoteId};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Category stamped onto every quote taken from a remote snapshot
pub const SERVER_CATEGORY: &str = "Server";

/// Sync transport errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Remote returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Shape of one item in the remote snapshot
#[derive(Debug, Deserialize)]
struct RemoteItem {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    title: String,
}

/// HTTP client for the remote quote endpoint
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: reqwest::Client,
    url: String,
    snapshot_limit: usize,
}

impl RemoteClient {
    /// Build a client for `url`, taking at most `snapshot_limit` items per fetch
    pub fn new(
        url: impl Into<String>,
        snapshot_limit: usize,
        timeout: Duration,
    ) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            snapshot_limit,
        })
    }

    /// Fetch the remote snapshot, mapped into quotes
    ///
    /// `title` becomes the quote text and the category is always the
    /// server sentinel. Items with a blank title are dropped without
    /// consuming a slot, so the result holds up to the snapshot limit of
    /// usable quotes, in remote order.
    pub async fn fetch_snapshot(&self) -> Result<Vec<Quote>, SyncError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status(response.status()));
        }

        let items: Vec<RemoteItem> = response.json().await?;
        let quotes: Vec<Quote> = items
            .into_iter()
            .filter_map(|item| {
                let mut quote = Quote::new(&item.title, SERVER_CATEGORY)?;
                quote.id = item.id.map(QuoteId::Number);
                Some(quote)
            })
            .take(self.snapshot_limit)
            .collect();

        tracing::debug!("Fetched {} quotes from remote", quotes.len());
        Ok(quotes)
    }

    /// Push the merged collection back to the remote
    ///
    /// The response body is ignored; a non-success status is an error the
    /// caller is expected to swallow (push is best-effort).
    pub async fn push_snapshot(&self, quotes: &[Quote]) -> Result<(), SyncError> {
        let response = self.client.post(&self.url).json(&quotes).send().await?;
        if !response.status().is_success() {
            return Err(SyncError::Status(response.status()));
        }
        tracing::debug!("Pushed {} quotes to remote", quotes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_item_tolerates_extra_fields() {
        let item: RemoteItem = serde_json::from_str(
            r#"{"userId": 1, "id": 2, "title": "quod", "body": "irrelevant"}"#,
        )
        .unwrap();
        assert_eq!(item.id, Some(2));
        assert_eq!(item.title, "quod");
    }

    #[test]
    fn test_remote_item_defaults() {
        let item: RemoteItem = serde_json::from_str("{}").unwrap();
        assert!(item.id.is_none());
        assert!(item.title.is_empty());
    }
}
