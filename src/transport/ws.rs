use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::protocol::Envelope;
use crate::transport::Transport;

/// Client side of a relay connection: one JSON envelope per text frame.
pub struct WsTransport<S> {
    stream: WebSocketStream<S>,
}

impl<S> WsTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

impl WsTransport<MaybeTlsStream<TcpStream>> {
    /// Connect to a relay at `addr` (`host:port`), using the `/ws` endpoint.
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let url = if addr.starts_with("ws://") || addr.starts_with("wss://") {
            addr.to_string()
        } else {
            format!("ws://{}/ws", addr)
        };
        log::debug!("Connecting to {}", url);
        let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to server: {}", e))?;
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl<S> Transport for WsTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, envelope: Envelope) -> anyhow::Result<()> {
        let text = envelope.to_json()?;
        self.stream
            .send(WsMessage::text(text))
            .await
            .map_err(|e| anyhow::anyhow!("Write error: {}", e))
    }

    async fn recv(&mut self) -> anyhow::Result<Envelope> {
        loop {
            match self.stream.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(Envelope::from_json(text.as_str())?),
                Some(Ok(WsMessage::Binary(data))) => {
                    let text = std::str::from_utf8(&data)
                        .map_err(|e| anyhow::anyhow!("Invalid UTF-8 frame: {}", e))?;
                    return Ok(Envelope::from_json(text)?);
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    return Err(anyhow::anyhow!("Connection closed by peer"))
                }
                // ping/pong are answered by tungstenite itself
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(anyhow::anyhow!("Read error: {}", e)),
            }
        }
    }

    /// Send a close frame. Errors are ignored; the peer may already be gone.
    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
