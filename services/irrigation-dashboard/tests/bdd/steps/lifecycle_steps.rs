//! BDD step definitions for the dashboard lifecycle feature

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use irrigation_dashboard::config::{Config, DashboardConfig};
use irrigation_dashboard::io::{HttpClient, HttpResponse};
use irrigation_dashboard::stream::{Inbound, StreamConnection, StreamConnector};
use irrigation_dashboard::DashboardBuilder;
use irrigation_telemetry::{DashboardState, DashboardView};

use crate::world::DashboardWorld;

const WAIT: Duration = Duration::from_secs(5);

// --- Test doubles ---

/// Gateway stub answering the two snapshot endpoints with canned responses.
/// A missing response means the gateway is unreachable.
#[derive(Debug)]
struct StubGateway {
    status: Option<(u16, String)>,
    history: Option<(u16, String)>,
}

#[async_trait]
impl HttpClient for StubGateway {
    async fn get(&self, url: &str) -> irrigation_dashboard::Result<HttpResponse> {
        let canned = if url.ends_with("/api/status") {
            &self.status
        } else if url.ends_with("/api/history") {
            &self.history
        } else {
            &None
        };
        match canned {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Err(irrigation_dashboard::DashboardError::Http(format!(
                "GET {} failed: connection refused",
                url
            ))),
        }
    }
}

/// Stream connection that replays frames, then stays open
struct ReplayConnection {
    frames: VecDeque<Inbound>,
}

#[async_trait]
impl StreamConnection for ReplayConnection {
    async fn recv(&mut self) -> Inbound {
        match self.frames.pop_front() {
            Some(frame) => frame,
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> irrigation_dashboard::Result<()> {
        Ok(())
    }
}

struct ReplayConnector {
    frames: Mutex<Option<Vec<Inbound>>>,
    refuse: bool,
}

#[async_trait]
impl StreamConnector for ReplayConnector {
    async fn connect(
        &self,
        _url: &str,
    ) -> irrigation_dashboard::Result<Box<dyn StreamConnection>> {
        if self.refuse {
            return Err(irrigation_dashboard::DashboardError::Stream(
                "connection refused".to_string(),
            ));
        }
        let frames = self.frames.lock().unwrap().take().unwrap_or_default();
        Ok(Box::new(ReplayConnection {
            frames: frames.into(),
        }))
    }
}

fn current(world: &DashboardWorld) -> DashboardState {
    world
        .live_state
        .as_ref()
        .expect("dashboard not started")
        .borrow()
        .clone()
}

async fn wait_until(
    world: &mut DashboardWorld,
    what: &str,
    pred: impl FnMut(&DashboardState) -> bool,
) {
    let handle = world.live_state.as_mut().expect("dashboard not started");
    let reached = matches!(
        tokio::time::timeout(WAIT, handle.wait_for(pred)).await,
        Ok(Ok(_))
    );
    assert!(
        reached,
        "timed out waiting for {}; state: {:?}",
        what,
        *handle.borrow()
    );
}

// --- Given steps ---

#[given(expr = "a gateway at {string}")]
fn gateway_at(world: &mut DashboardWorld, base: String) {
    world.api_base = Some(base);
}

#[given(expr = "the gateway status is {string}")]
fn gateway_status(world: &mut DashboardWorld, body: String) {
    world.gateway_status = Some((200, body));
}

#[given(expr = "the gateway history is {string}")]
fn gateway_history(world: &mut DashboardWorld, body: String) {
    world.gateway_history = Some((200, body));
}

#[given(expr = "the gateway answers status requests with HTTP {int}")]
fn gateway_status_code(world: &mut DashboardWorld, code: u16) {
    world.gateway_status = Some((code, "error".to_string()));
}

#[given(expr = "the gateway streams {string}")]
fn gateway_streams(world: &mut DashboardWorld, payload: String) {
    world.stream_frames.push(Inbound::Text(payload));
}

#[given("the gateway closes the stream")]
fn gateway_closes_stream(world: &mut DashboardWorld) {
    world.stream_frames.push(Inbound::Closed);
}

#[given("the gateway refuses stream connections")]
fn gateway_refuses_stream(world: &mut DashboardWorld) {
    world.stream_refused = true;
}

// --- When steps ---

#[when("the dashboard is started")]
async fn dashboard_started(world: &mut DashboardWorld) {
    let config = Config {
        api_base: world.api_base.clone(),
        dashboard: DashboardConfig {
            enabled: false,
            ..DashboardConfig::default()
        },
        ..Config::default()
    };
    let http = Arc::new(StubGateway {
        status: world.gateway_status.clone(),
        history: world.gateway_history.clone(),
    });
    let connector = Arc::new(ReplayConnector {
        frames: Mutex::new(Some(std::mem::take(&mut world.stream_frames))),
        refuse: world.stream_refused,
    });
    let cancel = CancellationToken::new();

    let dashboard = DashboardBuilder::new(config)
        .with_http_client(http as Arc<dyn HttpClient>)
        .with_stream_connector(connector as Arc<dyn StreamConnector>)
        .with_cancellation_token(cancel.clone())
        .build()
        .await
        .expect("dashboard should build");

    world.live_state = Some(dashboard.state());
    world.cancel = Some(cancel);
    world.running = Some(tokio::spawn(dashboard.start()));
}

#[when("the dashboard is stopped")]
async fn dashboard_stopped(world: &mut DashboardWorld) {
    world.cancel.as_ref().expect("dashboard not started").cancel();
    let running = world.running.take().expect("dashboard not started");
    let result = tokio::time::timeout(WAIT, running)
        .await
        .expect("dashboard did not stop in time")
        .expect("dashboard task panicked");
    assert!(result.is_ok(), "{:?}", result);
}

// --- Then steps ---

#[then("the dashboard should become connected")]
async fn becomes_connected(world: &mut DashboardWorld) {
    wait_until(world, "connection", |s| s.connected).await;
}

#[then("the dashboard should become disconnected")]
async fn becomes_disconnected(world: &mut DashboardWorld) {
    wait_until(world, "disconnection", |s| !s.connected).await;
}

#[then(expr = "the live card {word} should eventually show {string}")]
async fn live_card(world: &mut DashboardWorld, topic: String, expected: String) {
    let wanted = expected.clone();
    wait_until(world, &format!("card {} = {}", topic, expected), move |s| {
        DashboardView::from(s).card_value(&topic) == wanted
    })
    .await;
}

#[then(expr = "the live history should eventually hold {int} entries")]
async fn live_history(world: &mut DashboardWorld, expected: usize) {
    wait_until(world, &format!("{} history entries", expected), move |s| {
        s.history.len() == expected
    })
    .await;
}

#[then(expr = "the live banner should eventually read {string}")]
async fn live_banner(world: &mut DashboardWorld, expected: String) {
    let wanted = expected.clone();
    wait_until(world, &format!("banner '{}'", expected), move |s| {
        s.error.as_deref() == Some(wanted.as_str())
    })
    .await;
}

#[then("the live dashboard should show no banner")]
fn live_no_banner(world: &mut DashboardWorld) {
    assert!(current(world).error.is_none());
}
