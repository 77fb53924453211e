//! Events published by the dispatch loops.

use robolink_protocol::{Message, ProtocolError};

/// A message taken off the outbound queue and encoded for the robot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEvent {
    pub message: Message,
    /// The exact ASCII sent on the wire.
    pub wire: String,
}

/// The outcome of classifying one token taken off the inbound queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedEvent {
    /// The token was recognised.
    Message(Message),
    /// The token could not be classified. The loop keeps running; what to
    /// do about it is up to the observer.
    Rejected { token: String, error: ProtocolError },
}

impl ReceivedEvent {
    /// The decoded message, if classification succeeded.
    pub fn message(&self) -> Option<&Message> {
        match self {
            ReceivedEvent::Message(message) => Some(message),
            ReceivedEvent::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ReceivedEvent::Rejected { .. })
    }
}
