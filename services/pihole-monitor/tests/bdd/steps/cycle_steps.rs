//! BDD step definitions for the monitor cycle feature

use std::sync::atomic::Ordering;

use cucumber::{given, then, when};

use pihole_monitor::outcome::{BLOCK_GLYPH, CHECK_GLYPH};

use crate::world::{MonitorWorld, API_URL, LAST_BLOCKED_URL};

#[given("the network is up")]
fn network_up(world: &mut MonitorWorld) {
    world.probe.network.store(true, Ordering::SeqCst);
}

#[given("the network is down")]
fn network_down(world: &mut MonitorWorld) {
    world.probe.network.store(false, Ordering::SeqCst);
}

#[given("the Pi-hole answers pings")]
fn appliance_up(world: &mut MonitorWorld) {
    world.probe.appliance.store(true, Ordering::SeqCst);
}

#[given("the Pi-hole does not answer pings")]
fn appliance_down(world: &mut MonitorWorld) {
    world.probe.appliance.store(false, Ordering::SeqCst);
}

#[given(expr = "the Pi-hole reports status {string} with {int} queries and {int} blocked")]
fn appliance_reports(world: &mut MonitorWorld, status: String, queries: u64, blocked: u64) {
    let body = format!(
        r#"{{"status":"{}","dns_queries_today":{},"ads_blocked_today":{}}}"#,
        status, queries, blocked
    );
    world.api.respond(API_URL, 200, &body);
}

#[given("the status summary cannot be read")]
fn summary_unreadable(world: &mut MonitorWorld) {
    world.api.fail(API_URL, "connection reset");
}

#[given(expr = "the last blocked domain is {string}")]
fn last_blocked_is(world: &mut MonitorWorld, domain: String) {
    world.api.respond(LAST_BLOCKED_URL, 200, &domain);
}

#[given("the last blocked domain cannot be read")]
fn last_blocked_unreadable(world: &mut MonitorWorld) {
    world.api.respond(LAST_BLOCKED_URL, 500, "");
}

#[when(expr = "the last blocked domain changes to {string}")]
fn last_blocked_changes(world: &mut MonitorWorld, domain: String) {
    world.api.respond(LAST_BLOCKED_URL, 200, &domain);
}

#[when("the network comes back")]
fn network_returns(world: &mut MonitorWorld) {
    world.probe.network.store(true, Ordering::SeqCst);
}

#[when("the network goes down")]
fn network_lost(world: &mut MonitorWorld) {
    world.probe.network.store(false, Ordering::SeqCst);
}

#[when("a monitor cycle runs")]
async fn cycle_runs(world: &mut MonitorWorld) {
    world.run_cycle().await;
}

#[when("the same monitor cycle runs again")]
async fn cycle_runs_again(world: &mut MonitorWorld) {
    world.writes_before = world.display.write_count();
    world.run_cycle().await;
}

#[then(expr = "the display shows {string} and {string}")]
fn display_shows(world: &mut MonitorWorld, top: String, bottom: String) {
    assert_eq!(world.display.rows(), [top, bottom]);
}

#[then(expr = "the top row shows {int} queries and {int} blocked")]
fn top_row_counters(world: &mut MonitorWorld, queries: u64, blocked: u64) {
    let expected = format!("{} {}  {} {}", CHECK_GLYPH, queries, BLOCK_GLYPH, blocked);
    assert_eq!(world.display.rows()[0], expected);
}

#[then(expr = "the bottom row shows {string}")]
fn bottom_row_shows(world: &mut MonitorWorld, text: String) {
    assert_eq!(world.display.rows()[1], text);
}

#[then(expr = "the cycle outcome is {string}")]
fn outcome_is(world: &mut MonitorWorld, expected: String) {
    let outcome = world.last_outcome.as_ref().expect("no cycle has run");
    assert_eq!(outcome.to_string(), expected);
}

#[then("the last blocked domain was not requested")]
fn last_blocked_not_requested(world: &mut MonitorWorld) {
    assert!(!world.api.requested(LAST_BLOCKED_URL));
}

#[then("no API request was made")]
fn no_api_request(world: &mut MonitorWorld) {
    assert!(!world.api.requested(API_URL));
    assert!(!world.api.requested(LAST_BLOCKED_URL));
}

#[then("no additional display writes were made")]
fn no_additional_writes(world: &mut MonitorWorld) {
    assert_eq!(world.display.write_count(), world.writes_before);
}
