//! WebSocket relay server.
//!
//! ```text
//! Client A ──ws──┐                       ┌── outbox A ── writer task ──ws──> A
//!                ├── read loop ── Registry ┤
//! Client B ──ws──┘                       └── outbox B ── writer task ──ws──> B
//! ```
//!
//! Each accepted socket gets one task that reads envelopes and hands them to
//! the shared [`Registry`], plus a writer task draining that peer's outbound
//! queue. A read error, close frame or (if configured) idle timeout ends the
//! connection and tears down its room.

pub mod registry;

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::WebSocketStream;

use crate::protocol::Envelope;

pub use registry::{ConnId, JoinError, Peer, Registry, Room};

/// Relay server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: String,
    /// Close connections that send nothing for this long. `None` keeps a
    /// silent peer (and its room) alive indefinitely.
    pub idle_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            idle_timeout: None,
        }
    }
}

pub struct RelayServer {
    config: ServerConfig,
    registry: Arc<Registry>,
}

impl RelayServer {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry(config, Arc::new(Registry::new()))
    }

    pub fn with_registry(config: ServerConfig, registry: Arc<Registry>) -> Self {
        Self { config, registry }
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Bind the configured address and serve until the listener fails.
    pub async fn run(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        log::info!("Server started on {}", listener.local_addr()?);
        self.serve(listener).await
    }

    /// Accept connections from an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = listener.accept().await?;
            let registry = self.registry.clone();
            let idle_timeout = self.config.idle_timeout;
            tokio::spawn(async move {
                if let Err(e) = accept_connection(stream, addr, registry, idle_timeout).await {
                    log::warn!("Connection {} ended with error: {}", addr, e);
                }
            });
        }
    }
}

async fn accept_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<Registry>,
    idle_timeout: Option<Duration>,
) -> anyhow::Result<()> {
    let ws = tokio_tungstenite::accept_async(stream)
        .await
        .map_err(|e| anyhow::anyhow!("WebSocket handshake failed: {}", e))?;
    log::info!("WebSocket connection established from {}", addr);
    handle_connection(ws, registry, idle_timeout).await;
    Ok(())
}

/// Serve one upgraded connection until it drops, then tear down its room.
pub async fn handle_connection<S>(
    ws: WebSocketStream<S>,
    registry: Arc<Registry>,
    idle_timeout: Option<Duration>,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut sink, mut source) = ws.split();
    let (peer, mut outbox) = registry.connect();
    let id = peer.id();

    let mut writer = tokio::spawn(async move {
        while let Some(envelope) = outbox.recv().await {
            let text = match envelope.to_json() {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Peer {}: cannot encode {}: {}", id, envelope.kind, e);
                    continue;
                }
            };
            if let Err(e) = sink.send(WsMessage::text(text)).await {
                log::warn!("Peer {}: write error: {}", id, e);
                break;
            }
        }
    });

    loop {
        let next = tokio::select! {
            next = read_frame(&mut source, idle_timeout) => next,
            _ = &mut writer => {
                log::debug!("Peer {}: writer stopped", id);
                break;
            }
        };
        match next {
            Ok(Some(text)) => match Envelope::from_json(&text) {
                Ok(envelope) => registry.dispatch(&peer, envelope).await,
                Err(e) => log::warn!("Peer {}: ignoring frame: {}", id, e),
            },
            Ok(None) => continue,
            Err(reason) => {
                log::info!("Peer {} disconnected: {}", id, reason);
                break;
            }
        }
    }

    registry.disconnect(&peer).await;
    drop(peer);
    writer.abort();
}

/// Next text frame, `Ok(None)` for frames that carry no envelope, `Err` once
/// the connection is finished.
async fn read_frame<S>(
    source: &mut futures_util::stream::SplitStream<WebSocketStream<S>>,
    idle_timeout: Option<Duration>,
) -> Result<Option<String>, String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let frame = match idle_timeout {
        Some(limit) => timeout(limit, source.next())
            .await
            .map_err(|_| format!("idle for {:?}", limit))?,
        None => source.next().await,
    };
    match frame {
        Some(Ok(WsMessage::Text(text))) => Ok(Some(text.as_str().to_string())),
        Some(Ok(WsMessage::Binary(data))) => match String::from_utf8(data.to_vec()) {
            Ok(text) => Ok(Some(text)),
            Err(_) => Ok(None),
        },
        Some(Ok(WsMessage::Close(_))) | None => Err("connection closed".to_string()),
        Some(Ok(_)) => Ok(None),
        Some(Err(e)) => Err(e.to_string()),
    }
}
