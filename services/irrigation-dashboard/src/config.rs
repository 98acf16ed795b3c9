//! Configuration types for the irrigation dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;

use irrigation_telemetry::{ApiEndpoints, HISTORY_CAPACITY};

/// API base baked in at build time, used when neither the config file nor the
/// command line sets one
pub const BUILD_API_URL: Option<&str> = option_env!("IRRIGATION_API_URL");

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Telemetry gateway base URL, e.g. `http://192.168.1.20:8000`
    #[serde(default)]
    pub api_base: Option<String>,
    /// Origin the fallback API base is derived from
    #[serde(default = "default_page_origin")]
    pub page_origin: String,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: None,
            page_origin: default_page_origin(),
            history_capacity: default_history_capacity(),
            dashboard: DashboardConfig::default(),
        }
    }
}

impl Config {
    /// Resolve the gateway endpoints from the override chain and page origin
    pub fn endpoints(&self) -> crate::Result<ApiEndpoints> {
        let override_base = self.api_base.as_deref().or(BUILD_API_URL);
        ApiEndpoints::resolve(override_base, &self.page_origin).map_err(|e| {
            crate::DashboardError::Config(format!("Cannot resolve API base: {}", e))
        })
    }
}

/// Local dashboard server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

fn default_page_origin() -> String {
    "http://localhost".to_string()
}

fn default_history_capacity() -> usize {
    HISTORY_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
