//! Wiring between a [`Link`] and a [`RobotCommandManager`].

use std::sync::Arc;

use robolink_link::{Link, LinkError, LinkId};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{RobolinkError, RobotCommandManager};

/// Forwards traffic between the command manager and the robot.
///
/// Two tasks run for the lifetime of the bridge:
///   1. writer: every "sent" event is written to the link as one token
///   2. reader: every token read from the link is pushed to the inbound
///      queue, lossily decoded as UTF-8
///
/// Either task exits on a link error. The reader also exits when the
/// robot closes its end. Dropping the bridge without [`close`](Self::close)
/// stops the writer but leaves the reader running until the link ends.
pub struct RobotLinkBridge<L: Link> {
    link: Arc<L>,
    stop_writer: oneshot::Sender<()>,
    writer: JoinHandle<Result<(), LinkError>>,
    reader: JoinHandle<Result<(), LinkError>>,
}

impl<L: Link> RobotLinkBridge<L> {
    /// Subscribes to `manager`'s sent stream and starts both tasks.
    ///
    /// Messages encoded before this call are not forwarded.
    ///
    /// # Panics
    /// If called outside a Tokio runtime.
    pub fn spawn(manager: &RobotCommandManager, link: Arc<L>) -> Self {
        let link_id = link.id();
        tracing::debug!(%link_id, "bridging link to command manager");

        let mut sent = manager.subscribe_sent();
        let (stop_writer, mut stop_rx) = oneshot::channel::<()>();
        let writer_link = Arc::clone(&link);
        let writer = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    event = sent.recv() => match event {
                        Some(event) => forward(&*writer_link, link_id, &event.wire).await?,
                        None => return Ok(()),
                    },
                    _ = &mut stop_rx => {
                        // Flush what was encoded before the stop.
                        while let Some(event) = sent.try_recv() {
                            forward(&*writer_link, link_id, &event.wire).await?;
                        }
                        return Ok(());
                    }
                }
            }
        });

        let inbound = manager.inbound_queue();
        let reader_link = Arc::clone(&link);
        let reader = tokio::spawn(async move {
            loop {
                match reader_link.recv().await {
                    Ok(Some(data)) => {
                        let token = String::from_utf8_lossy(&data).into_owned();
                        tracing::trace!(%link_id, %token, "token from robot");
                        inbound.push(token);
                    }
                    Ok(None) => {
                        tracing::info!(%link_id, "robot closed the link");
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::warn!(%link_id, error = %e, "failed to read from robot");
                        return Err(e);
                    }
                }
            }
        });

        Self {
            link,
            stop_writer,
            writer,
            reader,
        }
    }

    pub fn link_id(&self) -> LinkId {
        self.link.id()
    }

    /// Whether both tasks have exited.
    pub fn is_finished(&self) -> bool {
        self.writer.is_finished() && self.reader.is_finished()
    }

    /// Stops forwarding and closes the link.
    ///
    /// Wire strings already published to the bridge are written to the link
    /// before it closes. Tokens the robot sends after this call are not read.
    ///
    /// # Errors
    /// The link error that ended the writer or reader task, if any, or the
    /// error from closing the link.
    pub async fn close(self) -> Result<(), RobolinkError> {
        // The writer may already have exited on a link error.
        let _ = self.stop_writer.send(());
        self.reader.abort();
        let writer = finished(self.writer).await;
        let reader = finished(self.reader).await;

        let closed = self.link.close().await;
        tracing::debug!(link_id = %self.link.id(), "bridge closed");
        writer?;
        reader?;
        closed?;
        Ok(())
    }
}

async fn forward<L: Link>(link: &L, link_id: LinkId, wire: &str) -> Result<(), LinkError> {
    link.send(wire.as_bytes()).await.inspect_err(|e| {
        tracing::warn!(%link_id, %wire, error = %e, "failed to send to robot");
    })
}

/// Awaits a task that was stopped or aborted, keeping the error it returned
/// on its own.
async fn finished(task: JoinHandle<Result<(), LinkError>>) -> Result<(), LinkError> {
    match task.await {
        Ok(result) => result,
        Err(e) if e.is_cancelled() => Ok(()),
        Err(e) => Err(LinkError::Closed(format!("bridge task failed: {e}"))),
    }
}
