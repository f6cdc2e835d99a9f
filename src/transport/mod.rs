use crate::protocol::{Envelope, Message};

/// Ordered, message-oriented connection to the relay (or directly to a peer).
///
/// A failed `recv` means the connection is gone; callers never retry.
#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, envelope: Envelope) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Envelope>;

    /// Encode and send a typed message.
    async fn send_message(&mut self, msg: &Message) -> anyhow::Result<()> {
        self.send(msg.to_envelope()).await
    }

    /// Shut the connection down politely. The default does nothing.
    async fn close(&mut self) {}
}

pub mod in_memory;
pub mod ws;

pub use in_memory::InMemoryTransport;
pub use ws::WsTransport;
