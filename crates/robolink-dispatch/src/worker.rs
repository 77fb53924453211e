//! The per-tick work of the outbound and inbound loops.

use robolink_protocol::{classify, encode, Message};
use tracing::{trace, warn};

use crate::{CommandQueue, Publisher, ReceivedEvent, SentEvent};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The queue was empty.
    Idle,
    /// One item was taken off the queue and published.
    Processed,
    /// One item was taken off the queue but could not be processed. The
    /// failure was published as an event.
    Failed,
}

/// Something a [`DispatchLoop`](crate::DispatchLoop) runs once per tick.
///
/// A tick must not block: it takes at most one item, handles it and
/// returns. Waiting between ticks is the loop's job.
pub trait Worker: Send + 'static {
    /// Short name used in logs and errors.
    const NAME: &'static str;

    fn tick(&mut self) -> TickOutcome;
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Drains the outbound queue: one message per tick is encoded and
/// published to the "sent" observers.
pub struct OutboundWorker {
    queue: CommandQueue<Message>,
    sent: Publisher<SentEvent>,
}

impl OutboundWorker {
    pub fn new(queue: CommandQueue<Message>, sent: Publisher<SentEvent>) -> Self {
        Self { queue, sent }
    }
}

impl Worker for OutboundWorker {
    const NAME: &'static str = "outbound";

    fn tick(&mut self) -> TickOutcome {
        let Some(message) = self.queue.pop() else {
            return TickOutcome::Idle;
        };

        let wire = encode(&message);
        trace!(%wire, kind = %message.kind(), "sending message");
        self.sent.publish(SentEvent { message, wire });
        TickOutcome::Processed
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Drains the inbound queue: one raw token per tick is classified and the
/// result, message or rejection, is published to the "received" observers.
pub struct InboundWorker {
    queue: CommandQueue<String>,
    received: Publisher<ReceivedEvent>,
}

impl InboundWorker {
    pub fn new(queue: CommandQueue<String>, received: Publisher<ReceivedEvent>) -> Self {
        Self { queue, received }
    }
}

impl Worker for InboundWorker {
    const NAME: &'static str = "inbound";

    fn tick(&mut self) -> TickOutcome {
        let Some(token) = self.queue.pop() else {
            return TickOutcome::Idle;
        };

        match classify(&token) {
            Ok(message) => {
                trace!(%token, kind = %message.kind(), "received message");
                self.received.publish(ReceivedEvent::Message(message));
                TickOutcome::Processed
            }
            Err(error) => {
                warn!(%token, %error, "rejected token from robot");
                self.received.publish(ReceivedEvent::Rejected { token, error });
                TickOutcome::Failed
            }
        }
    }
}
