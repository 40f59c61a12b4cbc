//! Monitor loop: probes, fetches, derives and renders on a fixed cadence

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::facts::StatusFacts;
use crate::host;
use crate::outcome::{shutdown_rows, CycleOutcome};
use crate::position::AppliancePosition;
use crate::probe::ConnectivityProbe;
use crate::reconciler::{RenderedState, Screen};
use crate::status::{LastBlockedEntry, StatusClient};

/// Owns the Pi-hole position and what the display currently shows
pub struct MonitorLoop {
    position: AppliancePosition,
    probe: Arc<dyn ConnectivityProbe>,
    status: StatusClient,
    screen: Screen,
    interval: Duration,
}

impl MonitorLoop {
    pub fn new(
        position: AppliancePosition,
        probe: Arc<dyn ConnectivityProbe>,
        status: StatusClient,
        screen: Screen,
        interval: Duration,
    ) -> Self {
        Self {
            position,
            probe,
            status,
            screen,
            interval,
        }
    }

    pub fn rendered(&self) -> &RenderedState {
        self.screen.rendered()
    }

    /// Cycle until `cancel` fires, then show the exit message
    ///
    /// Cancellation is honoured before each cycle, while a cycle is in
    /// flight and while sleeping; an interrupted cycle is abandoned.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            "Monitoring Pi-hole at {} every {:?}",
            self.position.hostname(),
            self.interval
        );

        while !cancel.is_cancelled() {
            tokio::select! {
                outcome = self.run_cycle() => {
                    tracing::debug!("Cycle finished: {}", outcome);
                }
                _ = cancel.cancelled() => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => break,
            }
        }

        tracing::warn!("Cancel requested, please wait until the monitor has stopped");
        self.shutdown().await;
    }

    /// One full pass: evaluate, report, render
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let outcome = self.evaluate().await;
        self.report(&outcome).await;
        self.screen.show(&outcome.rows()).await;
        outcome
    }

    /// Probe and fetch, stopping at the first degraded branch
    pub async fn evaluate(&self) -> CycleOutcome {
        if !self.probe.check_network().await {
            return CycleOutcome::Offline;
        }

        if !self.probe.check_appliance(&self.position).await {
            return CycleOutcome::ApplianceUnreachable;
        }

        // A failed summary is tolerated here but cannot prove blocking is on.
        let snapshot = match self.status.fetch_snapshot(&self.position).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::error!("An error occurred while reading the API: {}", e);
                None
            }
        };
        let Some(snapshot) = snapshot.filter(|s| StatusFacts::derive(s).is_enabled()) else {
            return CycleOutcome::ApplianceDisabled;
        };

        let last_blocked = match self.status.fetch_last_blocked(&self.position).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("The last Pi-hole block could not be read: {}", e);
                LastBlockedEntry::placeholder()
            }
        };

        CycleOutcome::Nominal(snapshot, last_blocked)
    }

    pub async fn shutdown(&mut self) {
        self.screen.show_fresh(&shutdown_rows()).await;
        tracing::info!("Monitor stopped");
    }

    async fn report(&self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Offline => {
                tracing::error!("The network cannot be reached. Please check your router.")
            }
            CycleOutcome::ApplianceUnreachable => tracing::error!(
                "The Pi-hole on {} could not be found. Please check its power and LAN connection.",
                self.position.hostname()
            ),
            CycleOutcome::ApplianceDisabled => tracing::warn!(
                "The Pi-hole was detected, but blocking is turned off. \
                 This can happen during an update of the Pi-hole."
            ),
            CycleOutcome::Nominal(snapshot, last_blocked) => {
                let facts = StatusFacts::derive(snapshot);
                let cpu = host::cpu_temperature()
                    .await
                    .map(|t| format!("{:.2}°C", t))
                    .unwrap_or_else(|| "n/a".to_string());
                tracing::info!(
                    "Requests / blocked: {}/{}, last block: {:?}, CPU: {}",
                    facts.query_count(),
                    facts.blocked_count(),
                    last_blocked.as_str(),
                    cpu
                );
            }
        }
    }
}
