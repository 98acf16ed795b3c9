//! Snapshot loader: seeds the dashboard from /api/status and /api/history

use std::sync::Arc;

use irrigation_telemetry::{ApiEndpoints, CurrentState, HistoryEntry, StateEvent};
use serde::de::DeserializeOwned;

use crate::io::HttpClient;
use crate::reconciler::EventSender;

/// Issues the two snapshot requests once at startup
pub struct SnapshotLoader {
    http: Arc<dyn HttpClient>,
    endpoints: ApiEndpoints,
}

impl SnapshotLoader {
    pub fn new(http: Arc<dyn HttpClient>, endpoints: ApiEndpoints) -> Self {
        Self { http, endpoints }
    }

    /// Fetch status and history concurrently. Each completion is forwarded as
    /// soon as it arrives; neither waits for the other.
    pub async fn load(&self, events: &EventSender) {
        tokio::join!(self.load_status(events), self.load_history(events));
    }

    async fn load_status(&self, events: &EventSender) {
        let event = match self.fetch::<CurrentState>(&self.endpoints.status_url()).await {
            Ok(status) => {
                tracing::debug!("Loaded status for {} topics", status.len());
                StateEvent::StatusLoaded(status)
            }
            Err(e) => {
                tracing::error!("Failed to fetch /api/status: {}", e);
                StateEvent::StatusFailed
            }
        };
        if events.send(event).await.is_err() {
            tracing::debug!("Dashboard gone before status snapshot arrived");
        }
    }

    async fn load_history(&self, events: &EventSender) {
        match self
            .fetch::<Vec<serde_json::Value>>(&self.endpoints.history_url())
            .await
        {
            Ok(values) => {
                let (history, skipped) = HistoryEntry::parse_snapshot(values);
                if skipped > 0 {
                    tracing::warn!("Skipped {} malformed history entries", skipped);
                }
                tracing::debug!("Loaded {} history entries", history.len());
                if events.send(StateEvent::HistoryLoaded(history)).await.is_err() {
                    tracing::debug!("Dashboard gone before history snapshot arrived");
                }
            }
            Err(e) => tracing::error!("Failed to fetch /api/history: {}", e),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> crate::Result<T> {
        let response = self.http.get(url).await?;
        if !response.is_success() {
            return Err(crate::DashboardError::Http(format!(
                "GET {} returned status {}",
                url, response.status
            )));
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}
