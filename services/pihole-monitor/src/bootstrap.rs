//! First-run discovery of the Pi-hole host and API token

use std::net::IpAddr;
use std::path::Path;

use crate::config::{load_config, save_config, ApplianceConfig, Config};
use crate::position::{api_url_for_host, AppliancePosition};

/// Pi-hole settings file holding the hashed web password
pub const SETUP_VARS_PATH: &str = "/etc/pihole/setupVars.conf";

/// Hostname a Pi-hole usually answers to on the LAN
pub const DEFAULT_PIHOLE_NAME: &str = "pihole";

/// Values supplied on the command line for the bootstrap
#[derive(Debug, Clone, Default)]
pub struct BootstrapOverrides {
    pub hostname: Option<String>,
    pub token: Option<String>,
}

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Loaded,
    Created,
}

/// Load the config at `path`, or start from defaults when there is none
pub fn load_or_default(path: &Path) -> crate::Result<Config> {
    if path.exists() {
        tracing::debug!("Loading configuration from {:?}", path);
        load_config(path)
    } else {
        tracing::warn!("Config {:?} does not exist, creating a new one", path);
        Ok(Config::default())
    }
}

/// Fill in a missing appliance section and persist the result to `path`
pub async fn ensure_appliance(
    config: &mut Config,
    path: &Path,
    overrides: &BootstrapOverrides,
    setup_vars: &Path,
) -> crate::Result<ConfigSource> {
    if config.appliance.is_some() {
        return Ok(ConfigSource::Loaded);
    }

    let appliance = discover_appliance(overrides, setup_vars).await?;
    AppliancePosition::from_config(&appliance)?;
    config.appliance = Some(appliance);
    save_config(path, config)?;
    tracing::info!("Stored a new config file at {:?}", path);
    Ok(ConfigSource::Created)
}

async fn discover_appliance(
    overrides: &BootstrapOverrides,
    setup_vars: &Path,
) -> crate::Result<ApplianceConfig> {
    let hostname = match &overrides.hostname {
        Some(host) => host.clone(),
        None => discover_hostname(DEFAULT_PIHOLE_NAME).await.ok_or_else(|| {
            crate::PiholeMonitorError::Config(
                "No Pi-hole could be detected; pass --host".to_string(),
            )
        })?,
    };

    let web_token = match &overrides.token {
        Some(token) => token.clone(),
        None => read_web_token(setup_vars).ok_or_else(|| {
            crate::PiholeMonitorError::Config(format!(
                "No web password found in {:?}; pass --token",
                setup_vars
            ))
        })?,
    };

    Ok(ApplianceConfig {
        api_url: api_url_for_host(&hostname),
        hostname,
        web_token,
    })
}

/// Resolve `name` to its first address
pub async fn discover_hostname(name: &str) -> Option<String> {
    match tokio::net::lookup_host((name, 0)).await {
        Ok(addrs) => {
            let ip = preferred_address(addrs.map(|addr| addr.ip()))?;
            tracing::info!("Detected Pi-hole at {}", ip);
            Some(ip.to_string())
        }
        Err(e) => {
            tracing::warn!("No Pi-hole could be detected as '{}': {}", name, e);
            None
        }
    }
}

/// First IPv4 address, else the first address of any family
fn preferred_address(addrs: impl IntoIterator<Item = IpAddr>) -> Option<IpAddr> {
    let mut fallback = None;
    for ip in addrs {
        if ip.is_ipv4() {
            return Some(ip);
        }
        fallback.get_or_insert(ip);
    }
    fallback
}

/// Value of the `WEBPASSWORD=` entry in a setupVars file
pub fn read_web_token(path: &Path) -> Option<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("Cannot read {:?}: {}", path, e);
            return None;
        }
    };
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("WEBPASSWORD="))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
