//! Network and Pi-hole reachability probes
//!
//! Both probes are bounded by a timeout and collapse every failure mode
//! (refused, unresolvable, timed out, missing `ping` binary) into `false`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::process::Command;

use crate::config::ProbeConfig;
use crate::position::AppliancePosition;

/// Reachability checks run at the top of every monitor cycle
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ConnectivityProbe: Send + Sync {
    /// True iff an outbound connection can be established
    async fn check_network(&self) -> bool;

    /// True iff the Pi-hole host answers a single echo request
    async fn check_appliance(&self, position: &AppliancePosition) -> bool;
}

/// Probe backed by a TCP dial and the system `ping` command
#[derive(Debug, Clone)]
pub struct SystemProbe {
    network_target: String,
    network_timeout: Duration,
    ping_command: String,
    ping_timeout: Duration,
}

impl SystemProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            network_target: config.network_target.clone(),
            network_timeout: config.network_timeout,
            ping_command: config.ping_command.clone(),
            ping_timeout: config.ping_timeout,
        }
    }

    /// Whole seconds handed to `ping -W`, never zero
    fn ping_wait_seconds(&self) -> u64 {
        self.ping_timeout.as_secs().max(1)
    }

    /// One echo request; `--` keeps the host from being read as an option
    fn ping_args(&self, host: &str) -> Vec<String> {
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            self.ping_wait_seconds().to_string(),
            "--".to_string(),
            host.to_string(),
        ]
    }
}

#[async_trait]
impl ConnectivityProbe for SystemProbe {
    async fn check_network(&self) -> bool {
        match tokio::time::timeout(
            self.network_timeout,
            TcpStream::connect(self.network_target.as_str()),
        )
        .await
        {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("Network probe to {} failed: {}", self.network_target, e);
                false
            }
            Err(_) => {
                tracing::debug!(
                    "Network probe to {} timed out after {:?}",
                    self.network_target,
                    self.network_timeout
                );
                false
            }
        }
    }

    async fn check_appliance(&self, position: &AppliancePosition) -> bool {
        let mut cmd = Command::new(&self.ping_command);
        cmd.args(self.ping_args(position.hostname()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // The child's own -W is only a hint; the outer timeout is the bound.
        let budget = self.ping_timeout + Duration::from_secs(1);
        match tokio::time::timeout(budget, cmd.status()).await {
            Ok(Ok(status)) => {
                tracing::debug!("ping {} -> {}", position.hostname(), status);
                status.success()
            }
            Ok(Err(e)) => {
                tracing::warn!("Failed to run '{}': {}", self.ping_command, e);
                false
            }
            Err(_) => {
                tracing::debug!("ping {} timed out after {:?}", position.hostname(), budget);
                false
            }
        }
    }
}
