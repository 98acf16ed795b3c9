//! Derived view of the dashboard state
//!
//! Pure functions from [`DashboardState`] to display strings. Both the
//! server-rendered page and the browser frontend render from this.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::state::DashboardState;

/// Shown on a card whose topic has not reported yet
pub const PLACEHOLDER: &str = "--";

/// Shown for a history row without a usable timestamp
pub const MISSING_TIMESTAMP: &str = "-";

/// A fixed sensor card bound to one topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSpec {
    pub topic: &'static str,
    pub title: &'static str,
}

pub const CARDS: [CardSpec; 4] = [
    CardSpec {
        topic: "V1",
        title: "Temperature (°C)",
    },
    CardSpec {
        topic: "V2",
        title: "Humidity (%)",
    },
    CardSpec {
        topic: "V3",
        title: "Soil Moisture (analog)",
    },
    CardSpec {
        topic: "V4",
        title: "Status",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub topic: String,
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub time: String,
    pub topic: String,
    pub value: String,
}

/// Everything the dashboard displays, history newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub connected: bool,
    pub error: Option<String>,
    pub cards: Vec<CardView>,
    pub history: Vec<HistoryRow>,
}

impl DashboardView {
    /// Build the view with timestamps rendered in the given time zone
    pub fn render_in<Tz>(state: &DashboardState, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let cards = CARDS
            .iter()
            .map(|card| CardView {
                topic: card.topic.to_string(),
                title: card.title.to_string(),
                value: state
                    .value(card.topic)
                    .map(|v| v.value.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            })
            .collect();

        let history = state
            .history
            .newest_first()
            .map(|entry| HistoryRow {
                time: format_timestamp_in(entry.ts, tz),
                topic: entry.topic.clone(),
                value: entry.value.to_string(),
            })
            .collect();

        Self {
            connected: state.connected,
            error: state.error.clone(),
            cards,
            history,
        }
    }

    pub fn card_value(&self, topic: &str) -> String {
        self.cards
            .iter()
            .find(|c| c.topic == topic)
            .map(|c| c.value.clone())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn status_label(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else {
            "Disconnected"
        }
    }
}

impl From<&DashboardState> for DashboardView {
    fn from(state: &DashboardState) -> Self {
        Self::render_in(state, &Local)
    }
}

/// Format unix seconds as a date-time string in the given time zone
pub fn format_timestamp_in<Tz>(ts: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !ts.is_finite() || ts == 0.0 {
        return MISSING_TIMESTAMP.to_string();
    }
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9) as u32;
    match DateTime::from_timestamp(secs as i64, nanos.min(999_999_999)) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => MISSING_TIMESTAMP.to_string(),
    }
}
