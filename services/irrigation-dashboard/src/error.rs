//! Error types for the irrigation dashboard

/// Errors that can occur in the irrigation dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Endpoint error: {0}")]
    Endpoint(#[from] irrigation_telemetry::EndpointError),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
