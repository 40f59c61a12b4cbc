//! BDD test world for the Pi-hole monitor

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cucumber::World;
use pihole_monitor::display::{DisplaySink, Glyph};
use pihole_monitor::io::{HttpClient, HttpResponse};
use pihole_monitor::monitor::MonitorLoop;
use pihole_monitor::outcome::CycleOutcome;
use pihole_monitor::position::AppliancePosition;
use pihole_monitor::probe::ConnectivityProbe;
use pihole_monitor::reconciler::Screen;
use pihole_monitor::status::StatusClient;
use pihole_monitor::PiholeMonitorError;

pub const API_URL: &str = "http://pi.hole/admin/api.php?";
pub const LAST_BLOCKED_URL: &str = "http://pi.hole/admin/api.php?recentBlocked&auth=secret";
pub const WIDTH: usize = 16;

/// Probe whose answers the scenario flips between cycles
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    pub network: Arc<AtomicBool>,
    pub appliance: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl ConnectivityProbe for ScriptedProbe {
    async fn check_network(&self) -> bool {
        self.network.load(Ordering::SeqCst)
    }

    async fn check_appliance(&self, _position: &AppliancePosition) -> bool {
        self.appliance.load(Ordering::SeqCst)
    }
}

/// HTTP client serving canned responses by URL and logging each request
#[derive(Debug, Clone, Default)]
pub struct CannedApi {
    responses: Arc<Mutex<HashMap<String, Result<HttpResponse, String>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedApi {
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(message.to_string()));
    }

    pub fn requested(&self, url: &str) -> bool {
        self.requests.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait::async_trait]
impl HttpClient for CannedApi {
    async fn get(&self, url: &str) -> pihole_monitor::Result<HttpResponse> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.responses.lock().unwrap().get(url) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(PiholeMonitorError::Http(message.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Display that keeps the current rows and a log of every write
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    rows: Arc<Mutex<[String; 2]>>,
    writes: Arc<Mutex<Vec<(usize, String)>>>,
    clears: Arc<Mutex<usize>>,
}

impl RecordingDisplay {
    /// Current rows with trailing padding removed
    pub fn rows(&self) -> [String; 2] {
        let rows = self.rows.lock().unwrap();
        [
            rows[0].trim_end().to_string(),
            rows[1].trim_end().to_string(),
        ]
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Rows written to after the first `skip` writes
    pub fn rows_written_since(&self, skip: usize) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .writes
            .lock()
            .unwrap()
            .iter()
            .skip(skip)
            .map(|(row, _)| *row)
            .collect();
        rows.dedup();
        rows
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl DisplaySink for RecordingDisplay {
    async fn clear(&mut self) -> pihole_monitor::Result<()> {
        *self.clears.lock().unwrap() += 1;
        *self.rows.lock().unwrap() = Default::default();
        Ok(())
    }

    async fn write_line(&mut self, text: &str, row: usize) -> pihole_monitor::Result<()> {
        self.writes
            .lock()
            .unwrap()
            .push((row, text.to_string()));
        self.rows.lock().unwrap()[row] = text.to_string();
        Ok(())
    }

    async fn load_custom_glyphs(&mut self, _glyphs: &[Glyph]) -> pihole_monitor::Result<()> {
        Ok(())
    }

    async fn set_backlight(&mut self, _on: bool) -> pihole_monitor::Result<()> {
        Ok(())
    }
}

#[derive(Default, World)]
pub struct MonitorWorld {
    pub probe: ScriptedProbe,
    pub api: CannedApi,
    pub display: RecordingDisplay,
    pub monitor: Option<MonitorLoop>,
    pub last_outcome: Option<CycleOutcome>,
    pub writes_before: usize,
}

impl fmt::Debug for MonitorWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorWorld")
            .field("probe", &self.probe)
            .field("display", &self.display.rows())
            .field("last_outcome", &self.last_outcome)
            .finish_non_exhaustive()
    }
}

impl MonitorWorld {
    /// The loop under test, built on first use against the world's fakes
    pub fn monitor(&mut self) -> &mut MonitorLoop {
        if self.monitor.is_none() {
            let position = AppliancePosition::new("pi.hole", API_URL, "secret")
                .expect("valid test position");
            self.monitor = Some(MonitorLoop::new(
                position,
                Arc::new(self.probe.clone()),
                StatusClient::new(Arc::new(self.api.clone())),
                Screen::new(Box::new(self.display.clone()), WIDTH),
                Duration::from_millis(10),
            ));
        }
        self.monitor.as_mut().expect("monitor just built")
    }

    pub async fn run_cycle(&mut self) {
        let outcome = self.monitor().run_cycle().await;
        self.last_outcome = Some(outcome);
    }
}
