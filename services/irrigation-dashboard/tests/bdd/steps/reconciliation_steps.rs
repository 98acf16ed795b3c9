//! BDD step definitions for the reconciliation feature

use cucumber::{given, then, when};

use irrigation_telemetry::{
    CurrentState, DashboardState, DashboardView, HistoryEntry, StateEvent, TopicValue,
};

use crate::world::DashboardWorld;

fn reading_payload(topic: &str, value: &str, ts: i64) -> String {
    format!(r#"{{"topic":"{}","value":{},"ts":{}}}"#, topic, value, ts)
}

fn apply(world: &mut DashboardWorld, event: StateEvent) {
    world.last_apply_failed = world.state.apply(event).is_err();
}

// --- Given steps ---

#[given(expr = "an empty dashboard with history capacity {int}")]
fn empty_dashboard(world: &mut DashboardWorld, capacity: usize) {
    world.state = DashboardState::new(capacity);
}

#[given(expr = "the status snapshot reports {word} = {word} at {int}")]
fn status_snapshot(world: &mut DashboardWorld, topic: String, value: String, ts: i64) {
    let value: TopicValue =
        serde_json::from_str(&format!(r#"{{"value":{},"ts":{}}}"#, value, ts)).unwrap();
    let mut status = CurrentState::new();
    status.insert(topic, value);
    apply(world, StateEvent::StatusLoaded(status));
}

#[given(expr = "the history snapshot holds {int} readings for {word}")]
fn history_snapshot(world: &mut DashboardWorld, count: usize, topic: String) {
    let entries = (0..count)
        .map(|i| HistoryEntry::new(topic.as_str(), i as i64, 1_700_000_000.0 + i as f64))
        .collect();
    apply(world, StateEvent::HistoryLoaded(entries));
}

#[given("the stream is open")]
fn stream_is_open(world: &mut DashboardWorld) {
    apply(world, StateEvent::StreamOpened);
}

// --- When steps ---

#[when(expr = "the stream delivers {word} = {word} at {int}")]
fn stream_delivers(world: &mut DashboardWorld, topic: String, value: String, ts: i64) {
    apply(
        world,
        StateEvent::StreamMessage(reading_payload(&topic, &value, ts)),
    );
}

#[when(expr = "the stream delivers {int} readings for {word}")]
fn stream_delivers_many(world: &mut DashboardWorld, count: usize, topic: String) {
    for i in 0..count {
        apply(
            world,
            StateEvent::StreamMessage(reading_payload(&topic, &i.to_string(), i as i64 + 1)),
        );
    }
}

#[when(expr = "the stream delivers the raw payload {string}")]
fn stream_delivers_raw(world: &mut DashboardWorld, payload: String) {
    apply(world, StateEvent::StreamMessage(payload));
}

#[when("the stream closes")]
fn stream_closes(world: &mut DashboardWorld) {
    apply(world, StateEvent::StreamClosed);
}

#[when("the stream fails")]
fn stream_fails(world: &mut DashboardWorld) {
    apply(world, StateEvent::StreamError("connection reset".to_string()));
}

#[when("the status snapshot fails")]
fn status_fails(world: &mut DashboardWorld) {
    apply(world, StateEvent::StatusFailed);
}

#[when("the stream address cannot be derived")]
fn stream_unavailable(world: &mut DashboardWorld) {
    apply(world, StateEvent::StreamUnavailable);
}

// --- Then steps ---

#[then(expr = "the card {word} should show {string}")]
fn card_shows(world: &mut DashboardWorld, topic: String, expected: String) {
    let view = DashboardView::from(&world.state);
    assert_eq!(view.card_value(&topic), expected);
}

#[then(expr = "the history should hold {int} entries")]
fn history_len(world: &mut DashboardWorld, expected: usize) {
    assert_eq!(world.state.history.len(), expected);
}

#[then(expr = "the newest history entry should be {word} = {word}")]
fn newest_entry(world: &mut DashboardWorld, topic: String, value: String) {
    let newest = world
        .state
        .history
        .newest_first()
        .next()
        .expect("history is empty");
    assert_eq!(newest.topic, topic);
    assert_eq!(newest.value.to_string(), value);
}

#[then(expr = "the oldest history entry should be {word} = {word}")]
fn oldest_entry(world: &mut DashboardWorld, topic: String, value: String) {
    let oldest = world.state.history.iter().next().expect("history is empty");
    assert_eq!(oldest.topic, topic);
    assert_eq!(oldest.value.to_string(), value);
}

#[then("the message should have been rejected")]
fn message_rejected(world: &mut DashboardWorld) {
    assert!(world.last_apply_failed, "expected the last event to fail");
}

#[then(expr = "the dashboard should be {word}")]
fn dashboard_connection(world: &mut DashboardWorld, expected: String) {
    let view = DashboardView::from(&world.state);
    assert_eq!(view.status_label(), expected);
}

#[then(expr = "the banner should read {string}")]
fn banner_reads(world: &mut DashboardWorld, expected: String) {
    assert_eq!(world.state.error.as_deref(), Some(expected.as_str()));
}

#[then("no banner should be shown")]
fn no_banner(world: &mut DashboardWorld) {
    assert!(world.state.error.is_none(), "{:?}", world.state.error);
}
