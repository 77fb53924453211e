//! Classification of raw tokens received from the robot.
//!
//! A token coming off the link carries no explicit type tag besides its
//! first character, and several kinds share characters with each other's
//! literals (`S#E` ends in `E`, `E#` starts with it). Classification
//! therefore tries each kind's grammar in a fixed order and keeps the
//! first one that matches.

use crate::{decode_as, Decoded, Message, MessageKind, ProtocolError};

/// Order in which kinds are attempted.
///
/// Longer literal grammars come first, the single-character DONE and
/// WARNING come last. Reordering this changes which message a token is
/// classified as.
pub const TRIAL_ORDER: [MessageKind; 6] = [
    MessageKind::StateChange,
    MessageKind::End,
    MessageKind::Location,
    MessageKind::Movement,
    MessageKind::Done,
    MessageKind::Warning,
];

/// Classifies the message at the front of `token`.
///
/// Trailing content after the first message is ignored; use
/// [`classify_prefix`] to learn how much was consumed.
///
/// ```rust
/// use robolink_protocol::{classify, Message};
///
/// assert_eq!(classify("E#").unwrap(), Message::End);
/// assert_eq!(classify("W5").unwrap(), Message::warning(5).unwrap());
/// ```
///
/// # Errors
/// - `EmptyInput` if `token` is empty.
/// - `InvalidMessageFormat` with `kind: None` if no kind matched.
pub fn classify(token: &str) -> Result<Message, ProtocolError> {
    classify_prefix(token).map(|decoded| decoded.message)
}

/// Like [`classify`], but also returns the consumed prefix.
///
/// # Errors
/// Same as [`classify`].
pub fn classify_prefix(token: &str) -> Result<Decoded<'_>, ProtocolError> {
    if token.is_empty() {
        return Err(ProtocolError::EmptyInput);
    }

    TRIAL_ORDER
        .iter()
        .find_map(|kind| decode_as(*kind, token).ok())
        .ok_or_else(|| ProtocolError::InvalidMessageFormat {
            kind: None,
            token: token.to_string(),
        })
}

/// Splits a buffer holding several back-to-back messages.
///
/// Stops at the first byte that does not start a message and reports
/// the unparsed remainder in the error, so nothing is silently dropped.
///
/// # Errors
/// `EmptyInput` for an empty buffer, otherwise the first
/// `InvalidMessageFormat` encountered.
pub fn classify_all(buffer: &str) -> Result<Vec<Message>, ProtocolError> {
    if buffer.is_empty() {
        return Err(ProtocolError::EmptyInput);
    }

    let mut messages = Vec::new();
    let mut rest = buffer;
    while !rest.is_empty() {
        let decoded = classify_prefix(rest)?;
        messages.push(decoded.message);
        rest = &rest[decoded.consumed()..];
    }
    Ok(messages)
}
