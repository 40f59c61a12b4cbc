//! Network identity of the monitored Pi-hole

use std::fmt;
use std::net::Ipv6Addr;

use reqwest::Url;

use crate::config::ApplianceConfig;

/// Query key that selects the most recently blocked domain
const RECENT_BLOCKED_ACTION: &str = "recentBlocked";

/// Host, API endpoints and token of the Pi-hole, fixed for one run
#[derive(Clone, PartialEq, Eq)]
pub struct AppliancePosition {
    hostname: String,
    status_url: String,
    last_blocked_url: String,
}

impl fmt::Debug for AppliancePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppliancePosition")
            .field("hostname", &self.hostname)
            .field("status_url", &self.status_url)
            .finish()
    }
}

impl AppliancePosition {
    pub fn new(hostname: &str, api_url: &str, token: &str) -> crate::Result<Self> {
        if hostname.is_empty() || hostname.starts_with('-') {
            return Err(crate::PiholeMonitorError::Config(format!(
                "Invalid Pi-hole hostname '{}'",
                hostname
            )));
        }

        let status = Url::parse(api_url).map_err(|e| {
            crate::PiholeMonitorError::Config(format!("Invalid API URL '{}': {}", api_url, e))
        })?;

        let mut last_blocked = status.clone();
        last_blocked
            .query_pairs_mut()
            .append_key_only(RECENT_BLOCKED_ACTION)
            .append_pair("auth", token);

        Ok(Self {
            hostname: hostname.to_string(),
            status_url: status.to_string(),
            last_blocked_url: last_blocked.to_string(),
        })
    }

    pub fn from_config(config: &ApplianceConfig) -> crate::Result<Self> {
        Self::new(&config.hostname, &config.api_url, &config.web_token)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    /// Carries the token as a query credential
    pub fn last_blocked_url(&self) -> &str {
        &self.last_blocked_url
    }
}

/// Default API endpoint for a Pi-hole host; IPv6 literals are bracketed
pub fn api_url_for_host(hostname: &str) -> String {
    match hostname.parse::<Ipv6Addr>() {
        Ok(ip) => format!("http://[{}]/admin/api.php?", ip),
        Err(_) => format!("http://{}/admin/api.php?", hostname),
    }
}
