//! In-memory link, both ends in the same process.

use tokio::sync::{mpsc, Mutex};

use crate::{next_link_id, Link, LinkError, LinkId};

/// One end of an in-memory link.
///
/// Create both ends with [`LoopbackLink::pair`]: tokens sent on one end
/// are received on the other, in order. Stands in for the Bluetooth
/// serial port in tests, with the far end playing the robot.
pub struct LoopbackLink {
    id: LinkId,
    tx: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl LoopbackLink {
    /// Creates two connected endpoints.
    pub fn pair() -> (LoopbackLink, LoopbackLink) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        let a = LoopbackLink {
            id: next_link_id(),
            tx: Mutex::new(Some(a_tx)),
            rx: Mutex::new(a_rx),
        };
        let b = LoopbackLink {
            id: next_link_id(),
            tx: Mutex::new(Some(b_tx)),
            rx: Mutex::new(b_rx),
        };
        tracing::debug!(a = %a.id, b = %b.id, "loopback link created");
        (a, b)
    }
}

impl Link for LoopbackLink {
    async fn send(&self, token: &[u8]) -> Result<(), LinkError> {
        let tx = self.tx.lock().await;
        let tx = tx
            .as_ref()
            .ok_or_else(|| LinkError::Closed(format!("{} was closed", self.id)))?;
        tx.send(token.to_vec())
            .map_err(|_| LinkError::Closed(format!("peer of {} is gone", self.id)))
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, LinkError> {
        Ok(self.rx.lock().await.recv().await)
    }

    /// Closes the sending half. This end can still receive what the peer
    /// sends.
    async fn close(&self) -> Result<(), LinkError> {
        if self.tx.lock().await.take().is_some() {
            tracing::debug!(id = %self.id, "loopback link closed");
        }
        Ok(())
    }

    fn id(&self) -> LinkId {
        self.id
    }
}
