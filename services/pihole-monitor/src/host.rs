//! Host diagnostics included in the cycle report

use sysinfo::{Component, Components};

/// Sensor label fragments that identify the CPU or SoC
const CPU_LABELS: [&str; 4] = ["cpu", "soc", "core", "package"];

/// Current CPU temperature in degrees Celsius, if any sensor reports one
pub async fn cpu_temperature() -> Option<f64> {
    match tokio::task::spawn_blocking(read_sensors).await {
        Ok(readings) => pick_cpu_temperature(&readings),
        Err(e) => {
            tracing::debug!("Temperature task failed: {}", e);
            None
        }
    }
}

fn read_sensors() -> Vec<(String, Option<f32>)> {
    Components::new_with_refreshed_list()
        .iter()
        .map(|c: &Component| (c.label().to_string(), c.temperature()))
        .collect()
}

/// Prefer a sensor labelled as the CPU, else the hottest reading
fn pick_cpu_temperature(readings: &[(String, Option<f32>)]) -> Option<f64> {
    let is_cpu = |label: &str| {
        let label = label.to_lowercase();
        CPU_LABELS.iter().any(|fragment| label.contains(fragment))
    };

    let cpu = readings
        .iter()
        .filter(|(label, _)| is_cpu(label))
        .find_map(|(_, temp)| *temp);
    let temp = cpu.or_else(|| readings.iter().filter_map(|(_, temp)| *temp).reduce(f32::max))?;
    Some((f64::from(temp) * 100.0).round() / 100.0)
}
