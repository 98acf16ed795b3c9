//! One dashboard session: snapshot loader, stream reader and state owner

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::config::Config;
use crate::io::HttpClient;
use crate::reconciler::{self, StateHandle};
use crate::snapshot::SnapshotLoader;
use crate::stream::{run_stream, StreamConnector};

/// A running dashboard session
///
/// Created state lives until [`Session::shutdown`] or until the session is
/// dropped; either way the stream socket is closed. Snapshot requests still in
/// flight are not cancelled; their results are dropped once the session has
/// stopped.
pub struct Session {
    state: StateHandle,
    cancel: DropGuard,
    stream: JoinHandle<()>,
    reconciler: JoinHandle<()>,
}

impl Session {
    /// Start loading snapshots and open the stream. Must be called from
    /// within a tokio runtime.
    pub fn start(
        config: &Config,
        http: Arc<dyn HttpClient>,
        connector: Arc<dyn StreamConnector>,
    ) -> crate::Result<Self> {
        let endpoints = config.endpoints()?;
        let cancel = CancellationToken::new();
        let (events, reconciler, state) = reconciler::channel(config.history_capacity);

        let reconciler = tokio::spawn(reconciler.run(cancel.clone()));

        let loader = SnapshotLoader::new(http, endpoints.clone());
        let snapshot_events = events.clone();
        tokio::spawn(async move {
            loader.load(&snapshot_events).await;
        });

        let stream_url = endpoints.stream_url();
        let stream_cancel = cancel.clone();
        let stream = tokio::spawn(async move {
            run_stream(connector.as_ref(), stream_url, events, stream_cancel).await;
        });

        tracing::info!("Dashboard session started against {}", endpoints.base());

        Ok(Self {
            state,
            cancel: cancel.drop_guard(),
            stream,
            reconciler,
        })
    }

    pub fn state(&self) -> StateHandle {
        self.state.clone()
    }

    /// Close the stream and stop applying updates. The socket close is
    /// bounded, so a peer that stopped reading cannot hold this up.
    pub async fn shutdown(self) {
        drop(self.cancel);
        if let Err(e) = self.stream.await {
            tracing::warn!("Stream task ended abnormally: {}", e);
        }
        if let Err(e) = self.reconciler.await {
            tracing::warn!("Reconciler task ended abnormally: {}", e);
        }
        tracing::info!("Dashboard session stopped");
    }
}
