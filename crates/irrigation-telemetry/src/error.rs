//! Error types for telemetry handling

/// Errors deriving the API and stream endpoints
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Invalid page origin {origin:?}: {source}")]
    InvalidPageOrigin {
        origin: String,
        source: url::ParseError,
    },

    #[error("Invalid API base {base:?}: {source}")]
    InvalidBase {
        base: String,
        source: url::ParseError,
    },

    #[error("URL {0:?} has no host")]
    MissingHost(String),
}

/// Errors applying an event to the dashboard state
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Invalid stream message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}
