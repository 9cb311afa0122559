use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::transport::Transport;

/// Channel-backed transport for tests and in-process play.
pub struct InMemoryTransport {
    tx: UnboundedSender<String>,
    rx: UnboundedReceiver<String>,
}

impl InMemoryTransport {
    /// Two connected ends: lines sent on one are received on the other.
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();
        (Self { tx: tx1, rx: rx2 }, Self { tx: tx2, rx: rx1 })
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.tx
            .send(line.to_string())
            .map_err(|_| anyhow::anyhow!("Channel closed"))
    }

    async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.rx.recv().await.map(|line| line.trim().to_string()))
    }
}
