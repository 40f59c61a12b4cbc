//! Startup sequence shown on the display before the monitor loop begins

use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::bootstrap::{self, BootstrapOverrides, ConfigSource};
use crate::config::{Config, DisplayConfig};
use crate::display::CUSTOM_GLYPHS;
use crate::io::HttpClient;
use crate::outcome::splash_rows;
use crate::position::AppliancePosition;
use crate::probe::ConnectivityProbe;
use crate::reconciler::Screen;
use crate::update;

/// How long startup messages stay on the display
const DEFAULT_PAUSE: Duration = Duration::from_millis(1500);

/// Display section to use, honouring a console override
pub fn effective_display(display: &DisplayConfig, console: bool) -> DisplayConfig {
    if console {
        DisplayConfig::Console {
            width: display.width(),
        }
    } else {
        display.clone()
    }
}

/// Splash, config bootstrap and appliance greeting
#[derive(Debug, Clone)]
pub struct Startup {
    config_path: PathBuf,
    overrides: BootstrapOverrides,
    setup_vars: PathBuf,
    backlight_off: bool,
    check_updates: bool,
    pause: Duration,
}

impl Startup {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            overrides: BootstrapOverrides::default(),
            setup_vars: PathBuf::from(bootstrap::SETUP_VARS_PATH),
            backlight_off: false,
            check_updates: true,
            pause: DEFAULT_PAUSE,
        }
    }

    pub fn with_overrides(mut self, overrides: BootstrapOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_setup_vars(mut self, path: impl Into<PathBuf>) -> Self {
        self.setup_vars = path.into();
        self
    }

    pub fn with_backlight_off(mut self, off: bool) -> Self {
        self.backlight_off = off;
        self
    }

    pub fn with_update_check(mut self, enabled: bool) -> Self {
        self.check_updates = enabled;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Run the sequence and hand back the position the loop will watch
    ///
    /// Backlight and glyph failures are fatal, as is a config that cannot be
    /// completed. The display is cleared on success.
    pub async fn run(
        &self,
        config: &mut Config,
        screen: &mut Screen,
        probe: &dyn ConnectivityProbe,
        http: &dyn HttpClient,
        cancel: &CancellationToken,
    ) -> crate::Result<AppliancePosition> {
        if self.backlight_off {
            tracing::warn!("Option: Backlight turned off!");
        }
        screen
            .set_backlight(config.display.backlight() && !self.backlight_off)
            .await?;
        screen.show(&splash_rows(crate::VERSION)).await;
        screen.load_custom_glyphs(&CUSTOM_GLYPHS).await?;
        self.pause(cancel).await;

        if self.check_updates && config.update_check.enabled {
            if let Some(url) = &config.update_check.url {
                update::report_update(http, url, crate::VERSION).await;
            }
        }

        screen.show_row(1, "Reading config").await;
        let source = bootstrap::ensure_appliance(
            config,
            &self.config_path,
            &self.overrides,
            &self.setup_vars,
        )
        .await?;
        match source {
            ConfigSource::Loaded => screen.show_row(1, "Config loaded").await,
            ConfigSource::Created => screen.show_row(1, "Stored config").await,
        }

        let appliance = config.appliance.as_ref().ok_or_else(|| {
            crate::PiholeMonitorError::Config("No Pi-hole configured".to_string())
        })?;
        let position = AppliancePosition::from_config(appliance)?;
        tracing::debug!("Using {:?}", position);

        if probe.check_appliance(&position).await {
            screen.show_row(1, position.hostname()).await;
            self.pause(cancel).await;
        } else {
            tracing::error!("Pi-hole could not be found at {}", position.hostname());
        }

        screen.clear().await;
        Ok(position)
    }

    async fn pause(&self, cancel: &CancellationToken) {
        tokio::select! {
            _ = tokio::time::sleep(self.pause) => {}
            _ = cancel.cancelled() => {}
        }
    }
}
