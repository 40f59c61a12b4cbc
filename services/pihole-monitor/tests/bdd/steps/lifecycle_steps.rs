//! BDD step definitions for stopping the monitor

use std::time::Duration;

use cucumber::{then, when};
use tokio_util::sync::CancellationToken;

use crate::world::MonitorWorld;

#[when("the monitor is cancelled before it starts")]
async fn cancelled_before_start(world: &mut MonitorWorld) {
    world.monitor();
    let monitor = world.monitor.take().expect("monitor just built");
    let cancel = CancellationToken::new();
    cancel.cancel();
    monitor.run(cancel).await;
}

#[when("the monitor runs and is cancelled")]
async fn run_then_cancel(world: &mut MonitorWorld) {
    world.monitor();
    let monitor = world.monitor.take().expect("monitor just built");
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(monitor.run(cancel.clone()));
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("monitor did not stop")
        .expect("monitor task panicked");
}

#[then("the display was cleared once")]
fn cleared_once(world: &mut MonitorWorld) {
    assert_eq!(world.display.clear_count(), 1);
}
