//! Pi-hole HTTP API client

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::FetchError;
use crate::io::{HttpClient, HttpResponse};
use crate::position::AppliancePosition;

/// Fields of the summary payload the monitor cares about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    pub status: String,
    pub dns_queries_today: u64,
    pub ads_blocked_today: u64,
}

/// Most recently blocked domain, kept as opaque text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastBlockedEntry(String);

impl LastBlockedEntry {
    /// Shown when the last-blocked call fails
    pub const PLACEHOLDER: &'static str = "Error reading";

    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LastBlockedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues the two API calls of a monitor cycle
#[derive(Clone)]
pub struct StatusClient {
    http: Arc<dyn HttpClient>,
}

impl fmt::Debug for StatusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusClient").finish_non_exhaustive()
    }
}

impl StatusClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Unauthenticated summary request
    pub async fn fetch_snapshot(
        &self,
        position: &AppliancePosition,
    ) -> Result<StatusSnapshot, FetchError> {
        let response = self.get_ok(position.status_url()).await?;
        let snapshot = serde_json::from_str::<StatusSnapshot>(&response.body)
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        tracing::debug!(
            "Snapshot from {}: status={}, queries={}, blocked={}",
            position.hostname(),
            snapshot.status,
            snapshot.dns_queries_today,
            snapshot.ads_blocked_today
        );
        Ok(snapshot)
    }

    /// Token-authenticated request; the body is the entry verbatim
    pub async fn fetch_last_blocked(
        &self,
        position: &AppliancePosition,
    ) -> Result<LastBlockedEntry, FetchError> {
        let response = self.get_ok(position.last_blocked_url()).await?;
        Ok(LastBlockedEntry::new(response.body))
    }

    async fn get_ok(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self
            .http
            .get(url)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        if !response.is_success() {
            return Err(FetchError::HttpStatus(response.status));
        }
        Ok(response)
    }
}
