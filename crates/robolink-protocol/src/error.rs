//! Error types for the protocol layer.
//!
//! Each crate in robolink defines its own error enum. A `ProtocolError`
//! always means the problem is in building, encoding, or classifying a
//! message, never in the link to the robot or in the dispatch loops.

use crate::MessageKind;

/// Errors that can occur in the protocol layer.
///
/// `Clone` and `PartialEq` are derived because classification failures
/// are not thrown at a caller: the inbound loop publishes them to every
/// observer of the "received" stream, and tests compare them directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// Classification was asked to parse a zero-length token.
    ///
    /// This is distinct from a parse failure: there is nothing to try
    /// the grammar rules against.
    #[error("the token received from the robot is empty")]
    EmptyInput,

    /// The token does not start with a valid message.
    ///
    /// `kind` is `Some` when a single grammar rule was attempted (e.g.
    /// [`decode_as`](crate::decode_as)) and `None` when the factory
    /// exhausted the whole trial order.
    #[error("{}", invalid_format_text(.kind, .token))]
    InvalidMessageFormat {
        kind: Option<MessageKind>,
        token: String,
    },

    /// A payload was built with a field outside the grammar's range,
    /// e.g. a warning counter of 12 or a location column of -1.
    ///
    /// Raised at construction time, so a malformed message never
    /// reaches the outbound queue.
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload {
        kind: MessageKind,
        reason: String,
    },

    /// Serialization through a non-wire codec failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(String),

    /// Deserialization through a non-wire codec failed.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(String),
}

impl ProtocolError {
    /// Shorthand for an [`InvalidMessageFormat`](Self::InvalidMessageFormat)
    /// raised by one grammar rule.
    pub(crate) fn invalid(kind: MessageKind, token: &str) -> Self {
        Self::InvalidMessageFormat {
            kind: Some(kind),
            token: token.to_string(),
        }
    }

    pub(crate) fn malformed(kind: MessageKind, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            kind,
            reason: reason.into(),
        }
    }
}

fn invalid_format_text(kind: &Option<MessageKind>, token: &str) -> String {
    match kind {
        Some(kind) => format!("can't build {kind} from message \"{token}\""),
        None => format!("couldn't parse message \"{token}\""),
    }
}
