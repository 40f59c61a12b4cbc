//! Pi-hole Monitor - Pi-hole status on a 16x2 character LCD
//!
//! Probes the network and the Pi-hole, reads its summary API and renders the
//! result on an HD44780 display, rewriting only the rows that changed.

pub mod bootstrap;
pub mod config;
pub mod display;
pub mod error;
pub mod facts;
pub mod hd44780;
pub mod host;
pub mod io;
pub mod monitor;
pub mod outcome;
pub mod position;
pub mod probe;
pub mod reconciler;
pub mod startup;
pub mod status;
pub mod update;

pub use config::{load_config, Config};
pub use error::{PiholeMonitorError, Result};

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::bootstrap::BootstrapOverrides;
use crate::config::DisplayConfig;
use crate::display::{ConsoleDisplay, DisplaySink};
use crate::hd44780::Hd44780Display;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::monitor::MonitorLoop;
use crate::probe::{ConnectivityProbe, SystemProbe};
use crate::reconciler::Screen;
use crate::startup::Startup;
use crate::status::StatusClient;

/// Version shown on the splash screen and compared by the update check
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command-line choices that shape a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub backlight_off: bool,
    pub console: bool,
    pub overrides: BootstrapOverrides,
    pub check_updates: bool,
}

/// Acquire the display sink named by `config`
pub async fn open_display(config: &DisplayConfig) -> Result<Box<dyn DisplaySink>> {
    match config {
        DisplayConfig::Hd44780I2c { bus, address, .. } => {
            tracing::info!("Loading LCD driver on {:?}", bus);
            let lcd = Hd44780Display::open(bus, *address).await.map_err(|e| {
                tracing::error!("The connection to the display failed: {}", e);
                tracing::error!("From a shell you can run i2cdetect -y 1");
                e
            })?;
            Ok(Box::new(lcd))
        }
        DisplayConfig::Console { .. } => Ok(Box::new(ConsoleDisplay::new())),
    }
}

/// Run the monitor until ctrl-c
pub async fn run(options: RunOptions) -> Result<()> {
    let cancel = CancellationToken::new();

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    let mut config = bootstrap::load_or_default(&options.config_path)?;
    config.display = startup::effective_display(&config.display, options.console);

    let sink = open_display(&config.display).await?;
    let mut screen = Screen::new(sink, config.display.width());
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(config.http.timeout)?);
    let probe: Arc<dyn ConnectivityProbe> = Arc::new(SystemProbe::new(&config.probe));

    let position = Startup::new(&options.config_path)
        .with_overrides(options.overrides)
        .with_backlight_off(options.backlight_off)
        .with_update_check(options.check_updates)
        .run(&mut config, &mut screen, probe.as_ref(), http.as_ref(), &cancel)
        .await?;

    let monitor = MonitorLoop::new(
        position,
        probe,
        StatusClient::new(Arc::clone(&http)),
        screen,
        config.poll_interval,
    );
    monitor.run(cancel).await;

    Ok(())
}
