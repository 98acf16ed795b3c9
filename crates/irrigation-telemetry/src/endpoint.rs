//! Resolution of the telemetry API base and the stream URL derived from it

use url::Url;

use crate::error::EndpointError;

/// Port the gateway listens on when no API base override is given
pub const DEFAULT_API_PORT: u16 = 8000;

/// REST and stream endpoints of one telemetry gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    base: String,
}

impl ApiEndpoints {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Use the override when present and non-empty, otherwise
    /// `{page scheme}//{page hostname}:8000`
    pub fn resolve(override_base: Option<&str>, page_origin: &str) -> Result<Self, EndpointError> {
        if let Some(base) = override_base.map(str::trim).filter(|b| !b.is_empty()) {
            return Ok(Self::new(base));
        }

        let page = Url::parse(page_origin).map_err(|source| EndpointError::InvalidPageOrigin {
            origin: page_origin.to_string(),
            source,
        })?;
        let host = page
            .host_str()
            .ok_or_else(|| EndpointError::MissingHost(page_origin.to_string()))?;
        let scheme = if page.scheme() == "https" {
            "https"
        } else {
            "http"
        };

        Ok(Self::new(format!("{}://{}:{}", scheme, host, DEFAULT_API_PORT)))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn status_url(&self) -> String {
        format!("{}/api/status", self.base)
    }

    pub fn history_url(&self) -> String {
        format!("{}/api/history", self.base)
    }

    /// `wss://host[:port]/ws` for an https base, `ws://...` for anything else
    pub fn stream_url(&self) -> Result<String, EndpointError> {
        let base = Url::parse(&self.base).map_err(|source| EndpointError::InvalidBase {
            base: self.base.clone(),
            source,
        })?;
        let host = base
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| EndpointError::MissingHost(self.base.clone()))?;
        let scheme = if base.scheme() == "https" { "wss" } else { "ws" };

        Ok(match base.port() {
            Some(port) => format!("{}://{}:{}/ws", scheme, host, port),
            None => format!("{}://{}/ws", scheme, host),
        })
    }
}
