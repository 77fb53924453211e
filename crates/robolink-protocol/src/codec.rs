//! Encoding and decoding of single messages.
//!
//! Two layers live here:
//!
//! - Per-kind functions ([`encode`], [`decode_as`]) that implement the
//!   wire grammar directly. These are what the dispatch loops use.
//! - The [`Codec`] trait, which turns whole messages into bytes and back.
//!   [`WireCodec`] speaks the robot's ASCII grammar; [`JsonCodec`] (behind
//!   the `json` feature) is a readable form for tooling and logs.

use crate::{classify, grammar, Message, MessageKind, ProtocolError};

/// The result of decoding the front of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<'a> {
    /// The parsed message.
    pub message: Message,
    /// The exact prefix of the input that the message was read from.
    /// This is the message's canonical wire form.
    pub raw: &'a str,
}

impl Decoded<'_> {
    /// Number of bytes of the input consumed by this message.
    pub fn consumed(&self) -> usize {
        self.raw.len()
    }
}

/// Produces the canonical wire form of a message.
///
/// Encoding is pure and cannot fail: payload constructors already
/// rejected anything the grammar can't express.
///
/// ```rust
/// use robolink_protocol::{encode, Direction, Message};
///
/// assert_eq!(encode(&Message::movement(Direction::Left, true)), "M#30");
/// assert_eq!(encode(&Message::StateChange), "S#E");
/// ```
pub fn encode(message: &Message) -> String {
    let mut out = String::with_capacity(5);
    grammar::write(&mut out, message);
    out
}

/// Decodes the front of `token` with the rules of a single kind.
///
/// Matching is anchored at the first byte; trailing bytes are ignored
/// and reported back through [`Decoded::raw`].
///
/// # Errors
/// `InvalidMessageFormat` naming `kind` and `token` when the token does
/// not start with this kind's grammar.
pub fn decode_as(kind: MessageKind, token: &str) -> Result<Decoded<'_>, ProtocolError> {
    grammar::rules(kind)
        .iter()
        .find_map(|rule| rule(token))
        .map(|(message, consumed)| Decoded {
            message,
            raw: &token[..consumed],
        })
        .ok_or_else(|| ProtocolError::invalid(kind, token))
}

// ---------------------------------------------------------------------------
// Codec trait
// ---------------------------------------------------------------------------

/// Converts messages to bytes and back.
///
/// `Send + Sync + 'static` so a codec can be shared with the tasks
/// running the dispatch loops and the link bridge.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the format can't represent it.
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes one message from bytes.
    ///
    /// # Errors
    /// Returns a decode or classification error for malformed input.
    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError>;
}

/// A [`Codec`] speaking the robot's ASCII wire grammar.
///
/// Decoding runs the full classification trial order, so the caller
/// doesn't need to know the kind up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl Codec for WireCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError> {
        Ok(encode(message).into_bytes())
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        // Non-UTF-8 bytes can never match the grammar, but the lossy form
        // keeps them visible in the error.
        let token = String::from_utf8_lossy(data);
        classify(&token)
    }
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Not understood by the robot. Useful to record traffic in a readable
/// form or to hand messages to a UI running in another process.
///
/// ```rust
/// use robolink_protocol::{Codec, JsonCodec, Message, Point};
///
/// let codec = JsonCodec;
/// let msg = Message::location(Point::new(2, 4)).unwrap();
/// let bytes = codec.encode(&msg).unwrap();
/// assert_eq!(codec.decode(&bytes).unwrap(), msg);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, message: &Message) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(message).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    fn decode(&self, data: &[u8]) -> Result<Message, ProtocolError> {
        serde_json::from_slice(data).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, Point};

    /// Every valid payload of every kind.
    fn all_messages() -> Vec<Message> {
        let mut all = vec![Message::Done, Message::End, Message::StateChange];
        for n in 0..=9 {
            all.push(Message::warning(n).unwrap());
        }
        for row in 0..=9 {
            for col in 0..=9 {
                all.push(Message::location(Point::new(row, col)).unwrap());
            }
        }
        for direction in Direction::ALL {
            all.push(Message::movement(direction, true));
            all.push(Message::movement(direction, false));
        }
        all.push(Message::block_detected(Point::new(0, 9), Point::new(1, 9)).unwrap());
        all
    }

    #[test]
    fn test_encode_literals() {
        assert_eq!(encode(&Message::warning(5).unwrap()), "W5");
        assert_eq!(encode(&Message::Done), "D");
        assert_eq!(encode(&Message::location(Point::new(7, 3)).unwrap()), "L37??");
        assert_eq!(encode(&Message::movement(Direction::Right, false)), "M#11");
        assert_eq!(encode(&Message::End), "E#");
        assert_eq!(encode(&Message::StateChange), "S#E");
        let block = Message::block_detected(Point::new(7, 3), Point::new(8, 3)).unwrap();
        assert_eq!(encode(&block), "L3738");
    }

    #[test]
    fn test_decode_as_own_kind_inverts_encode() {
        for message in all_messages() {
            let wire = encode(&message);
            let decoded = decode_as(message.kind(), &wire).unwrap();
            assert_eq!(decoded.message, message, "wire {wire}");
            assert_eq!(decoded.raw, wire);
        }
    }

    #[test]
    fn test_decode_as_reports_consumed_prefix() {
        let decoded = decode_as(MessageKind::Warning, "W3D").unwrap();
        assert_eq!(decoded.message, Message::warning(3).unwrap());
        assert_eq!(decoded.raw, "W3");
        assert_eq!(decoded.consumed(), 2);
    }

    #[test]
    fn test_decode_as_wrong_kind_names_attempted_kind() {
        let err = decode_as(MessageKind::End, "S#E").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InvalidMessageFormat {
                kind: Some(MessageKind::End),
                token: "S#E".into(),
            }
        );
    }

    #[test]
    fn test_display_is_wire_form() {
        assert_eq!(Message::movement(Direction::Up, true).to_string(), "M#00");
    }

    #[test]
    fn test_wire_codec_round_trip() {
        let codec = WireCodec;
        for message in all_messages() {
            let bytes = codec.encode(&message).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), message);
        }
    }

    #[test]
    fn test_wire_codec_rejects_invalid_utf8() {
        let err = WireCodec.decode(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidMessageFormat { kind: None, .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_round_trip_and_shape() {
        let codec = JsonCodec;
        for message in all_messages() {
            let bytes = codec.encode(&message).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), message);
        }
        let json = codec.encode(&Message::End).unwrap();
        assert_eq!(json, br#"{"type":"End"}"#);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_codec_rejects_out_of_range_digit() {
        let err = JsonCodec
            .decode(br#"{"type":"Warning","instructions":42}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Decode(_)));
    }
}
