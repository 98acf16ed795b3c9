//! Single owner of the dashboard state
//!
//! Producers (the snapshot loader and the stream reader) send [`StateEvent`]s
//! over a channel. The reconciler applies them one at a time and publishes
//! every revision through a watch channel, so readers never lock and the
//! state has exactly one writer.

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use irrigation_telemetry::{DashboardState, StateEvent};

/// Read side of the dashboard state
pub type StateHandle = watch::Receiver<DashboardState>;

/// Write side handed to event producers
pub type EventSender = mpsc::Sender<StateEvent>;

const EVENT_QUEUE_DEPTH: usize = 256;

pub struct Reconciler {
    events: mpsc::Receiver<StateEvent>,
    state: watch::Sender<DashboardState>,
}

/// Create a reconciler with an empty state
pub fn channel(history_capacity: usize) -> (EventSender, Reconciler, StateHandle) {
    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let (state_tx, state_rx) = watch::channel(DashboardState::new(history_capacity));
    let reconciler = Reconciler {
        events: event_rx,
        state: state_tx,
    };
    (event_tx, reconciler, state_rx)
}

impl Reconciler {
    /// Apply events until cancelled or until every producer has gone away.
    /// Events still queued at cancellation are discarded.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Reconciler cancelled");
                    break;
                }
                event = self.events.recv() => event,
            };

            match event {
                Some(event) => self.apply(event),
                None => {
                    tracing::debug!("All state producers finished");
                    break;
                }
            }
        }
    }

    fn apply(&self, event: StateEvent) {
        match &event {
            StateEvent::StreamOpened => tracing::info!("Telemetry stream open"),
            StateEvent::StreamClosed => tracing::info!("Telemetry stream closed"),
            StateEvent::StreamError(reason) => {
                tracing::warn!("Telemetry stream error: {}", reason)
            }
            _ => {}
        }

        self.state.send_modify(|state| {
            if let Err(e) = state.apply(event) {
                tracing::error!("{}", e);
            }
        });

        let state = self.state.borrow();
        tracing::debug!(
            "State: {} topics, {} history entries, connected={}",
            state.current.len(),
            state.history.len(),
            state.connected
        );
    }
}
