//! Sync resource (status + manual trigger) and the server health check.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

/// Backend-reported sync lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Idle,
    Syncing,
    Done,
    Error,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatus {
    pub status: SyncState,
    pub last_sync: Option<String>,
    pub last_error: Option<String>,
    pub next_scheduled: Option<String>,
    #[serde(default)]
    pub in_progress: bool,
}

impl SyncStatus {
    pub fn is_running(&self) -> bool {
        self.in_progress || self.status == SyncState::Syncing
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncTriggered {
    #[serde(default)]
    pub accepted: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Seam for the sync-watch state machine: anything that can report the
/// current sync status. Production uses [`ApiClient`]; tests script a
/// sequence of responses.
#[async_trait]
pub trait SyncProbe: Send + Sync {
    async fn probe(&self) -> Result<SyncStatus, ApiError>;
}

#[async_trait]
impl SyncProbe for ApiClient {
    async fn probe(&self) -> Result<SyncStatus, ApiError> {
        self.sync_status().await
    }
}

impl ApiClient {
    pub async fn sync_status(&self) -> Result<SyncStatus, ApiError> {
        self.get_json("/sync/status", &[], "sync status").await
    }

    pub async fn trigger_sync(&self) -> Result<SyncTriggered, ApiError> {
        self.post_empty("/sync/trigger", &[], "sync trigger").await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let builder = self.http().get(self.root_endpoint("/health"));
        match self.request(builder, "health").await? {
            Some(status) => Ok(status),
            None => Ok(HealthStatus {
                status: "unknown".to_string(),
                timestamp: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_states_do_not_fail_decoding() {
        let status: SyncStatus =
            serde_json::from_str(r#"{"status": "rebuilding", "in_progress": true}"#).unwrap();
        assert_eq!(status.status, SyncState::Unknown);
        assert!(status.is_running());
    }

    #[test]
    fn test_syncing_state_counts_as_running() {
        let status: SyncStatus = serde_json::from_str(r#"{"status": "syncing"}"#).unwrap();
        assert!(status.is_running());
        let idle: SyncStatus = serde_json::from_str(r#"{"status": "idle"}"#).unwrap();
        assert!(!idle.is_running());
    }
}
