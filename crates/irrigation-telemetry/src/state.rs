//! Dashboard state and the rules for reconciling snapshot and stream updates

use std::collections::BTreeMap;

use crate::error::ReconcileError;
use crate::history::History;
use crate::reading::{HistoryEntry, TopicValue};

/// Latest reading per topic
pub type CurrentState = BTreeMap<String, TopicValue>;

/// Banner shown when the status snapshot cannot be loaded
pub const STATUS_FETCH_FAILED: &str = "Failed to fetch initial status";

/// Banner shown when the stream connection cannot be constructed
pub const STREAM_UNAVAILABLE: &str = "WebSocket connection failed";

/// Everything that can change the dashboard state
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// /api/status answered; replaces the current values wholesale
    StatusLoaded(CurrentState),
    /// /api/status failed
    StatusFailed,
    /// /api/history answered; replaces the history wholesale
    HistoryLoaded(Vec<HistoryEntry>),
    StreamOpened,
    /// Raw text payload received on the stream
    StreamMessage(String),
    StreamClosed,
    /// Runtime stream failure, with a reason for the log
    StreamError(String),
    /// The stream URL could not be derived, so no socket was opened
    StreamUnavailable,
}

/// State rendered by the dashboard, mutated only through [`DashboardState::apply`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub current: CurrentState,
    pub history: History,
    pub connected: bool,
    pub error: Option<String>,
}

impl DashboardState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            history: History::with_capacity(history_capacity),
            ..Default::default()
        }
    }

    /// Apply one event. A malformed stream message is reported and leaves the
    /// state untouched; every other event always applies.
    pub fn apply(&mut self, event: StateEvent) -> Result<(), ReconcileError> {
        match event {
            StateEvent::StatusLoaded(status) => self.current = status,
            StateEvent::StatusFailed => self.error = Some(STATUS_FETCH_FAILED.to_string()),
            StateEvent::HistoryLoaded(entries) => self.history.replace(entries),
            StateEvent::StreamOpened => self.connected = true,
            StateEvent::StreamMessage(payload) => {
                let entry = HistoryEntry::parse(&payload)?;
                self.apply_message(entry);
            }
            StateEvent::StreamClosed | StateEvent::StreamError(_) => self.connected = false,
            StateEvent::StreamUnavailable => {
                self.connected = false;
                self.error = Some(STREAM_UNAVAILABLE.to_string());
            }
        }
        Ok(())
    }

    /// Upsert the topic's current value and append the message to history.
    /// The last processed message wins regardless of its timestamp.
    pub fn apply_message(&mut self, entry: HistoryEntry) {
        self.current.insert(entry.topic.clone(), entry.topic_value());
        self.history.push(entry);
    }

    /// Neither snapshot nor stream can start. Stays disconnected and shows
    /// the status banner, which takes precedence over the stream one.
    pub fn endpoints_unresolved(&mut self) {
        self.connected = false;
        self.error = Some(STATUS_FETCH_FAILED.to_string());
    }

    pub fn value(&self, topic: &str) -> Option<&TopicValue> {
        self.current.get(topic)
    }
}
