//! Live telemetry stream
//!
//! Opens the gateway's WebSocket and forwards its lifecycle (open, message,
//! close, error) to the reconciler. There is no reconnection: once the socket
//! closes or fails the dashboard stays disconnected.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use irrigation_telemetry::{EndpointError, StateEvent};

use crate::reconciler::EventSender;

/// Upper bound on the client side of the close handshake
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// What an open stream can yield
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Text(String),
    /// Binary frame of the given length; the gateway only sends text
    Binary(usize),
    Closed,
    Failed(String),
}

/// Opens stream connections
#[async_trait]
pub trait StreamConnector: Send + Sync {
    async fn connect(&self, url: &str) -> crate::Result<Box<dyn StreamConnection>>;
}

/// One open stream connection
#[async_trait]
pub trait StreamConnection: Send {
    /// Wait for the next frame. Must be cancel-safe.
    async fn recv(&mut self) -> Inbound;

    /// Close the socket from the client side
    async fn close(&mut self) -> crate::Result<()>;
}

/// Production connector using tokio-tungstenite
#[derive(Debug, Default)]
pub struct TungsteniteConnector;

#[async_trait]
impl StreamConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> crate::Result<Box<dyn StreamConnection>> {
        tracing::debug!("Connecting to {}", url);
        let (ws, response) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| crate::DashboardError::Stream(format!("Connect {} failed: {}", url, e)))?;
        tracing::debug!("Connected to {} ({})", url, response.status());
        Ok(Box::new(TungsteniteConnection { ws }))
    }
}

struct TungsteniteConnection {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl StreamConnection for TungsteniteConnection {
    async fn recv(&mut self) -> Inbound {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Inbound::Text(text),
                Some(Ok(Message::Binary(data))) => return Inbound::Binary(data.len()),
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!("Close frame received: {:?}", frame);
                    return Inbound::Closed;
                }
                // tungstenite answers pings itself
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Err(e)) => return Inbound::Failed(e.to_string()),
                None => return Inbound::Closed,
            }
        }
    }

    async fn close(&mut self) -> crate::Result<()> {
        self.ws
            .close(None)
            .await
            .map_err(|e| crate::DashboardError::Stream(format!("Close failed: {}", e)))
    }
}

/// Drive one stream connection for the lifetime of the dashboard
pub async fn run_stream(
    connector: &dyn StreamConnector,
    url: Result<String, EndpointError>,
    events: EventSender,
    cancel: CancellationToken,
) {
    let url = match url {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Failed to open websocket: {}", e);
            let _ = events.send(StateEvent::StreamUnavailable).await;
            return;
        }
    };

    let connected = tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        connected = connector.connect(&url) => connected,
    };

    let mut connection = match connected {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("WS error: {}", e);
            let _ = events.send(StateEvent::StreamError(e.to_string())).await;
            return;
        }
    };

    if events.send(StateEvent::StreamOpened).await.is_err() {
        close_quietly(connection.as_mut()).await;
        return;
    }

    loop {
        let inbound = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Closing telemetry stream");
                close_quietly(connection.as_mut()).await;
                return;
            }
            inbound = connection.recv() => inbound,
        };

        let event = match inbound {
            Inbound::Text(payload) => StateEvent::StreamMessage(payload),
            Inbound::Binary(len) => {
                tracing::error!("Invalid WS message: unexpected {} byte binary frame", len);
                continue;
            }
            Inbound::Closed => StateEvent::StreamClosed,
            Inbound::Failed(reason) => {
                tracing::error!("WS error: {}", reason);
                StateEvent::StreamError(reason)
            }
        };
        let terminal = matches!(
            event,
            StateEvent::StreamClosed | StateEvent::StreamError(_)
        );

        if events.send(event).await.is_err() {
            close_quietly(connection.as_mut()).await;
            return;
        }
        if terminal {
            return;
        }
    }
}

async fn close_quietly(connection: &mut dyn StreamConnection) {
    match tokio::time::timeout(CLOSE_TIMEOUT, connection.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!("{}", e),
        Err(_) => tracing::debug!(
            "Close frame not flushed within {:?}, dropping connection",
            CLOSE_TIMEOUT
        ),
    }
}
