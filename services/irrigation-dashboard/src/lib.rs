//! Irrigation dashboard - live telemetry view for a smart-irrigation gateway
//!
//! Seeds its state from the gateway's status and history snapshots, follows
//! the WebSocket stream, and serves the reconciled view over HTTP.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod reconciler;
pub mod session;
pub mod snapshot;
pub mod stream;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};
pub use session::Session;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::io::{HttpClient, ReqwestHttpClient};
use crate::reconciler::StateHandle;
use crate::stream::{StreamConnector, TungsteniteConnector};

/// Assembles an [`IrrigationDashboard`] from configuration, with optional
/// injected transports
pub struct DashboardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    connector: Option<Arc<dyn StreamConnector>>,
    cancel: Option<CancellationToken>,
}

impl DashboardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            connector: None,
            cancel: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_stream_connector(mut self, connector: Arc<dyn StreamConnector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Use an externally owned token instead of installing a ctrl-c handler
    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Start the session. Snapshot requests and the stream connection begin
    /// immediately.
    pub async fn build(self) -> Result<IrrigationDashboard> {
        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::default()),
        };
        let connector: Arc<dyn StreamConnector> = match self.connector {
            Some(connector) => connector,
            None => Arc::new(TungsteniteConnector),
        };

        let session = Session::start(&self.config, http, connector)?;

        let (cancel, handle_signals) = match self.cancel {
            Some(cancel) => (cancel, false),
            None => (CancellationToken::new(), true),
        };

        Ok(IrrigationDashboard {
            config: self.config,
            session,
            cancel,
            handle_signals,
        })
    }
}

/// A built dashboard, ready to serve
pub struct IrrigationDashboard {
    config: Config,
    session: Session,
    cancel: CancellationToken,
    handle_signals: bool,
}

impl IrrigationDashboard {
    pub fn state(&self) -> StateHandle {
        self.session.state()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Serve until cancelled, then close the stream
    pub async fn start(self) -> Result<()> {
        if self.handle_signals {
            let cancel_for_signal = self.cancel.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for ctrl-c: {}", e);
                    return;
                }
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            });
        }

        let server = if self.config.dashboard.enabled {
            let port = self.config.dashboard.port;
            let state = self.session.state();
            let cancel_for_dashboard = self.cancel.clone();

            Some(tokio::spawn(async move {
                let addr = SocketAddr::from(([0, 0, 0, 0], port));
                let listener = match tokio::net::TcpListener::bind(addr).await {
                    Ok(l) => l,
                    Err(e) => {
                        tracing::error!(
                            "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                            port,
                            e
                        );
                        return;
                    }
                };
                tracing::info!("Dashboard listening on http://{}", addr);

                if let Err(e) = dashboard::serve(listener, state, cancel_for_dashboard).await {
                    tracing::error!("{}", e);
                }
                tracing::debug!("Dashboard stopped");
            }))
        } else {
            None
        };

        tracing::info!("Irrigation dashboard started");
        self.cancel.cancelled().await;

        self.session.shutdown().await;
        if let Some(server) = server {
            if let Err(e) = server.await {
                tracing::warn!("Dashboard task ended abnormally: {}", e);
            }
        }
        tracing::info!("Irrigation dashboard stopped");

        Ok(())
    }
}

/// Run the dashboard with the given configuration until ctrl-c
pub async fn run(config: Config) -> Result<()> {
    DashboardBuilder::new(config).build().await?.start().await
}
