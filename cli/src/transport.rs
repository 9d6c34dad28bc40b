use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use carelog_core::{RemoteSnapshot, SyncPayload, SyncTransport};
use reqwest::Client;
use tracing::{debug, warn};

/// Pushes to and pulls from the spreadsheet webhook.
pub struct WebhookTransport {
    client: Client,
    url: String,
}

impl WebhookTransport {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl SyncTransport for WebhookTransport {
    async fn push_all(&self, payload: &SyncPayload) -> Result<()> {
        debug!(url = %self.url, entries = payload.timesheets.len(), "posting sync payload");
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.url))?;

        // A bad status still counts as sent.
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "webhook answered push with a non-success status");
        }
        Ok(())
    }

    async fn pull_all(&self) -> Option<RemoteSnapshot> {
        let response = match self
            .client
            .get(&self.url)
            .query(&[("action", "load")])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "pull request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "webhook answered pull with a non-success status");
            return None;
        }

        match response.json::<RemoteSnapshot>().await {
            Ok(snapshot) => {
                debug!(entries = snapshot.timesheets.len(), "pulled remote snapshot");
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "pull response was not a usable snapshot");
                None
            }
        }
    }
}
