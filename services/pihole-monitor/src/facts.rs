//! Display-worthy view of a status snapshot

use crate::status::StatusSnapshot;

/// Status value the Pi-hole reports while blocking is active
const ENABLED_MARKER: &str = "enabled";

/// Minimal facts derived from one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFacts {
    enabled: bool,
    queries: u64,
    blocked: u64,
}

impl StatusFacts {
    pub fn derive(snapshot: &StatusSnapshot) -> Self {
        Self {
            enabled: snapshot.status == ENABLED_MARKER,
            queries: snapshot.dns_queries_today,
            blocked: snapshot.ads_blocked_today,
        }
    }

    /// Only the exact `enabled` marker counts; anything else fails closed
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn query_count(&self) -> u64 {
        self.queries
    }

    pub fn blocked_count(&self) -> u64 {
        self.blocked
    }
}

impl From<&StatusSnapshot> for StatusFacts {
    fn from(snapshot: &StatusSnapshot) -> Self {
        Self::derive(snapshot)
    }
}
