//! Release check against a published version document

use std::cmp::Ordering;

use crate::io::HttpClient;

/// Result of comparing the running version with the published one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    Available(String),
}

/// Fetch the plain-text version at `url` and compare it with `current`
pub async fn check_for_update(
    http: &dyn HttpClient,
    url: &str,
    current: &str,
) -> crate::Result<UpdateStatus> {
    let response = http.get(url).await?;
    if !response.is_success() {
        return Err(crate::PiholeMonitorError::Http(format!(
            "Version check returned status {}",
            response.status
        )));
    }

    let latest = response.body.trim();
    let latest_parts = parse_version(latest).ok_or_else(|| {
        crate::PiholeMonitorError::Http(format!("Unreadable version '{}'", latest))
    })?;
    let current_parts = parse_version(current).ok_or_else(|| {
        crate::PiholeMonitorError::Config(format!("Unreadable version '{}'", current))
    })?;

    match compare_versions(&latest_parts, &current_parts) {
        Ordering::Greater => Ok(UpdateStatus::Available(latest.to_string())),
        _ => Ok(UpdateStatus::UpToDate),
    }
}

/// Log the outcome of an update check; failures are never fatal
pub async fn report_update(http: &dyn HttpClient, url: &str, current: &str) {
    match check_for_update(http, url, current).await {
        Ok(UpdateStatus::Available(latest)) => {
            tracing::warn!("There is an update available: {} (running {})", latest, current)
        }
        Ok(UpdateStatus::UpToDate) => {
            tracing::info!("Application is running latest version {}", current)
        }
        Err(e) => tracing::error!("An error occurred while searching for updates: {}", e),
    }
}

fn parse_version(text: &str) -> Option<Vec<u64>> {
    text.split('.').map(|part| part.parse().ok()).collect()
}

/// Missing trailing components count as zero, so `1.0` equals `1.0.0`
fn compare_versions(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}
