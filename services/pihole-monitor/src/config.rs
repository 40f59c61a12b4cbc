//! Configuration types for the Pi-hole monitor

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Filled in by the first-run bootstrap when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appliance: Option<ApplianceConfig>,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(default)]
    pub update_check: UpdateCheckConfig,
}

impl Config {
    /// Reject settings that parse but cannot be acted on
    pub fn validate(&self) -> crate::Result<()> {
        if self.update_check.enabled && self.update_check.url.is_none() {
            return Err(crate::PiholeMonitorError::Config(
                "update_check.enabled requires update_check.url".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            appliance: None,
            probe: ProbeConfig::default(),
            http: HttpConfig::default(),
            display: DisplayConfig::default(),
            poll_interval: default_poll_interval(),
            update_check: UpdateCheckConfig::default(),
        }
    }
}

/// Where the Pi-hole lives and how to authenticate against its API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceConfig {
    pub hostname: String,
    pub api_url: String,
    pub web_token: String,
}

/// Reachability probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `host:port` dialled to decide whether the network is up
    #[serde(default = "default_network_target")]
    pub network_target: String,
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub network_timeout: Duration,
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub ping_timeout: Duration,
    #[serde(default = "default_ping_command")]
    pub ping_command: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            network_target: default_network_target(),
            network_timeout: default_probe_timeout(),
            ping_timeout: default_probe_timeout(),
            ping_command: default_ping_command(),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_http_timeout(),
        }
    }
}

/// Display configuration with tagged enum for extensibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayConfig {
    #[serde(rename = "hd44780_i2c")]
    Hd44780I2c {
        #[serde(default = "default_i2c_bus")]
        bus: PathBuf,
        /// 7-bit slave address of the backpack
        #[serde(default = "default_i2c_address")]
        address: u8,
        #[serde(default = "default_width")]
        width: usize,
        #[serde(default = "default_true")]
        backlight: bool,
    },
    #[serde(rename = "console")]
    Console {
        #[serde(default = "default_width")]
        width: usize,
    },
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig::Hd44780I2c {
            bus: default_i2c_bus(),
            address: default_i2c_address(),
            width: default_width(),
            backlight: true,
        }
    }
}

impl DisplayConfig {
    pub fn width(&self) -> usize {
        match self {
            DisplayConfig::Hd44780I2c { width, .. } | DisplayConfig::Console { width } => *width,
        }
    }

    pub fn backlight(&self) -> bool {
        match self {
            DisplayConfig::Hd44780I2c { backlight, .. } => *backlight,
            DisplayConfig::Console { .. } => true,
        }
    }
}

/// Update notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCheckConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Plain-text document holding the latest released version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for UpdateCheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
        }
    }
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(3)
}

fn default_network_target() -> String {
    "www.google.com:80".to_string()
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_ping_command() -> String {
    "ping".to_string()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_i2c_bus() -> PathBuf {
    PathBuf::from("/dev/i2c-1")
}

fn default_i2c_address() -> u8 {
    0x27
}

fn default_width() -> usize {
    16
}

fn default_true() -> bool {
    true
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::PiholeMonitorError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Persist configuration as pretty-printed JSON
pub fn save_config(path: &Path, config: &Config) -> crate::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| {
        crate::PiholeMonitorError::Config(format!("Failed to write config file {:?}: {}", path, e))
    })?;
    Ok(())
}
