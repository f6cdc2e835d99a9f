use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::task::yield_now;

use crate::protocol::Envelope;
use crate::transport::Transport;

/// Pair of in-process endpoints; whatever one sends the other receives.
///
/// Dropping one end makes the other's `recv` fail once its queue is drained,
/// which is how a disconnect looks from the surviving side.
pub struct InMemoryTransport {
    recv_queue: Arc<Mutex<VecDeque<Envelope>>>,
    send_queue: Arc<Mutex<VecDeque<Envelope>>>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let q1 = Arc::new(Mutex::new(VecDeque::new()));
        let q2 = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                recv_queue: q1.clone(),
                send_queue: q2.clone(),
            },
            Self {
                recv_queue: q2,
                send_queue: q1,
            },
        )
    }

    fn peer_dropped(&self) -> bool {
        Arc::strong_count(&self.recv_queue) == 1
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, envelope: Envelope) -> anyhow::Result<()> {
        if Arc::strong_count(&self.send_queue) == 1 {
            return Err(anyhow::anyhow!("Channel closed"));
        }
        let mut queue = self
            .send_queue
            .lock()
            .map_err(|_| anyhow::anyhow!("Channel poisoned"))?;
        queue.push_back(envelope);
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Envelope> {
        loop {
            let next = {
                let mut queue = self
                    .recv_queue
                    .lock()
                    .map_err(|_| anyhow::anyhow!("Channel poisoned"))?;
                queue.pop_front()
            };
            if let Some(envelope) = next {
                return Ok(envelope);
            }
            if self.peer_dropped() {
                return Err(anyhow::anyhow!("Channel closed"));
            }
            yield_now().await;
        }
    }
}
