//! Sensor readings as published by the telemetry gateway

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scalar sensor value
///
/// The gateway forwards raw MQTT payloads, so values arrive as strings
/// (`"23.5"`) as often as numbers. Both render verbatim. A sensor that
/// published nothing usable arrives as `null` and renders empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

/// Integral floats below this print without a trailing `.0`
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => match n.as_f64() {
                Some(x) if n.is_f64() && x.fract() == 0.0 && x.abs() < MAX_EXACT_INTEGER => {
                    write!(f, "{}", x as i64)
                }
                _ => write!(f, "{}", n),
            },
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Scalar::Number)
            .unwrap_or_else(|| Scalar::Text(value.to_string()))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// Latest known reading for one topic, as served by /api/status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicValue {
    pub value: Scalar,
    /// Unix seconds, possibly fractional
    pub ts: f64,
}

/// One raw stream message, kept verbatim in the history window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub topic: String,
    pub value: Scalar,
    pub ts: f64,
}

impl HistoryEntry {
    pub fn new(topic: impl Into<String>, value: impl Into<Scalar>, ts: f64) -> Self {
        Self {
            topic: topic.into(),
            value: value.into(),
            ts,
        }
    }

    /// Parse a stream payload of the form `{"topic", "value", "ts"}`
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Parse a history snapshot entry by entry, dropping entries that do not
    /// have the message shape. Returns the kept entries and the skip count.
    pub fn parse_snapshot(values: Vec<serde_json::Value>) -> (Vec<Self>, usize) {
        let total = values.len();
        let entries: Vec<Self> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        let skipped = total - entries.len();
        (entries, skipped)
    }

    pub fn topic_value(&self) -> TopicValue {
        TopicValue {
            value: self.value.clone(),
            ts: self.ts,
        }
    }
}
